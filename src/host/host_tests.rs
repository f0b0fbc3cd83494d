use anyhow::{self, format_err};
use indexmap::IndexMap;

use crate::basis::ao::{BasisAngularOrder, BasisShell};
use crate::error::EfpGamessError;
use crate::host::{
    BasicWavefunction, ComputationKind, Host, OptionValue, ProcedureOptions, ProcedureTable,
    TransformationMatrixProvider, Wavefunction,
};
use crate::transformation::shell_map::ShellReorderingProvider;

struct CountingHost {
    bao: BasisAngularOrder,
    n_scf: usize,
    provider: ShellReorderingProvider,
}

impl Host for CountingHost {
    type Wfn = BasicWavefunction;

    fn scf_reference(
        &mut self,
        _name: &str,
        _options: &ProcedureOptions,
    ) -> Result<Self::Wfn, anyhow::Error> {
        self.n_scf += 1;
        Ok(BasicWavefunction::new(self.bao.clone(), 2))
    }

    fn transformation_matrix_provider(&self) -> &dyn TransformationMatrixProvider {
        &self.provider
    }
}

fn count_mos(
    host: &mut CountingHost,
    name: &str,
    ref_wfn: Option<BasicWavefunction>,
    options: &ProcedureOptions,
) -> Result<BasicWavefunction, anyhow::Error> {
    let mut wfn = match ref_wfn {
        Some(wfn) => wfn,
        None => host.scf_reference(name, options)?,
    };
    let fill = options.get_int_or("fill", 0)?;
    wfn.fock_alpha_mut().fill(fill as f64);
    Ok(wfn)
}

fn failing(
    _host: &mut CountingHost,
    _name: &str,
    _ref_wfn: Option<BasicWavefunction>,
    _options: &ProcedureOptions,
) -> Result<BasicWavefunction, anyhow::Error> {
    Err(format_err!("SCF did not converge."))
}

fn counting_host() -> CountingHost {
    CountingHost {
        bao: BasisAngularOrder::new(&[BasisShell::host(0, false), BasisShell::host(1, false)]),
        n_scf: 0,
        provider: ShellReorderingProvider,
    }
}

#[test]
fn test_host_basic_wavefunction_dimensions() {
    let bao = BasisAngularOrder::new(&[BasisShell::host(2, true), BasisShell::host(1, false)]);
    let wfn = BasicWavefunction::new(bao, 3);
    assert_eq!(wfn.n_ao(), 9);
    assert_eq!(wfn.n_so(), 8);
    assert_eq!(wfn.n_mo(), 3);
    assert_eq!(wfn.fock_alpha().shape(), &[8, 8]);
    assert_eq!(wfn.coefficients_alpha().shape(), &[8, 3]);
}

#[test]
fn test_host_options_case_insensitive() {
    let options = ProcedureOptions::new()
        .with("PRINT", 2_i64)
        .with("HDF5_Filename", "water.h5");
    assert_eq!(options.get("print"), Some(&OptionValue::Int(2)));
    assert_eq!(options.get_int_or("Print", 1).unwrap(), 2);
    assert_eq!(options.get_str_or("hdf5_filename", "form.h5").unwrap(), "water.h5");
    assert_eq!(options.get_str_or("missing", "form.h5").unwrap(), "form.h5");
    assert_eq!(options.get_int_or("missing", 7).unwrap(), 7);
}

#[test]
fn test_host_options_wrong_type() {
    let options = ProcedureOptions::new().with("print", "loud");
    assert_eq!(
        options.get_int_or("print", 1),
        Err(EfpGamessError::InvalidOption {
            key: "print".to_string(),
            reason: "expected an integer, found `loud`".to_string(),
        })
    );

    let options = ProcedureOptions::new().with("hdf5_filename", 3_i64);
    assert!(matches!(
        options.get_str_or("hdf5_filename", "form.h5"),
        Err(EfpGamessError::InvalidOption { .. })
    ));
}

#[test]
fn test_host_options_from_yaml() {
    let options: ProcedureOptions =
        serde_yaml::from_str("PRINT: 3\nhdf5_filename: form.h5\nverbose: true\n").unwrap();
    assert_eq!(options.get_int_or("print", 1).unwrap(), 3);
    assert_eq!(options.get("VERBOSE"), Some(&OptionValue::Bool(true)));

    let mut map = IndexMap::new();
    map.insert("Print".to_string(), OptionValue::Int(0));
    let options = ProcedureOptions::from(map);
    assert_eq!(options.get_int_or("print", 1).unwrap(), 0);
}

#[test]
fn test_host_procedure_table_dispatch() {
    let mut table = ProcedureTable::<CountingHost>::new();
    table.register(ComputationKind::Energy, "Count_MOs", count_mos);
    assert!(table.contains(ComputationKind::Energy, "count_mos"));
    assert!(!table.contains(ComputationKind::Energy, "count_mo"));

    let mut host = counting_host();
    let options = ProcedureOptions::new().with("fill", 5_i64);
    let wfn = table
        .call(&mut host, ComputationKind::Energy, "COUNT_MOS", None, &options)
        .unwrap();
    assert_eq!(host.n_scf, 1);
    assert!(wfn.fock_alpha().iter().all(|&x| x == 5.0));

    // A supplied reference wavefunction skips the SCF.
    let ref_wfn = BasicWavefunction::new(host.bao.clone(), 2);
    let _ = table
        .call(&mut host, ComputationKind::Energy, "count_mos", Some(ref_wfn), &options)
        .unwrap();
    assert_eq!(host.n_scf, 1);
}

#[test]
fn test_host_procedure_table_unknown() {
    let mut table = ProcedureTable::<CountingHost>::new();
    table.register(ComputationKind::Energy, "count_mos", count_mos);
    let mut host = counting_host();
    let options = ProcedureOptions::new();

    let err = table
        .call(&mut host, ComputationKind::Energy, "count_mos_gradient", None, &options)
        .unwrap_err();
    assert_eq!(
        err.downcast_ref::<EfpGamessError>(),
        Some(&EfpGamessError::UnknownProcedure(
            "count_mos_gradient".to_string()
        ))
    );

    let err = table
        .call(&mut host, ComputationKind::Energy, "scf", None, &options)
        .unwrap_err();
    assert!(err.downcast_ref::<EfpGamessError>().is_some());
}

#[test]
fn test_host_procedure_table_propagates_failure() {
    let mut table = ProcedureTable::<CountingHost>::new();
    table.register(ComputationKind::Energy, "failing", failing);
    let mut host = counting_host();
    let res = table.call(
        &mut host,
        ComputationKind::Energy,
        "failing",
        None,
        &ProcedureOptions::new(),
    );
    assert!(res.is_err());
}
