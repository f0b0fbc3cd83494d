use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow;
use approx::assert_abs_diff_eq;
use hdf5;
use ndarray::{array, Array1, Array2};
use serial_test::serial;

use crate::basis::ao::{BasisAngularOrder, BasisShell};
use crate::error::EfpGamessError;
use crate::host::{
    BasicWavefunction, ComputationKind, Host, ProcedureOptions, ProcedureTable,
    TransformationMatrixProvider, Wavefunction,
};
use crate::interfaces::gamess::{DEFAULT_FOCK_DATASET, DEFAULT_MO_COEFF_DATASET};
use crate::procedures::{register_procedures, run_efp_gamess};
use crate::transformation::shell_map::ShellReorderingProvider;

struct StubHost {
    bao: BasisAngularOrder,
    n_mo: usize,
    n_scf: usize,
    provider: ShellReorderingProvider,
}

impl StubHost {
    fn two_s() -> Self {
        Self {
            bao: BasisAngularOrder::new(&[BasisShell::host(0, false), BasisShell::host(0, false)]),
            n_mo: 1,
            n_scf: 0,
            provider: ShellReorderingProvider,
        }
    }
}

impl Host for StubHost {
    type Wfn = BasicWavefunction;

    fn scf_reference(
        &mut self,
        _name: &str,
        _options: &ProcedureOptions,
    ) -> Result<Self::Wfn, anyhow::Error> {
        self.n_scf += 1;
        Ok(BasicWavefunction::new(self.bao.clone(), self.n_mo))
    }

    fn transformation_matrix_provider(&self) -> &dyn TransformationMatrixProvider {
        &self.provider
    }
}

fn write_efpcalc(path: &Path, fock: &Array1<f64>, mo_coeff: &Array2<f64>) {
    let f = hdf5::File::create(path).unwrap();
    let group = f.create_group("EFPcalc").unwrap();
    group
        .new_dataset_builder()
        .with_data(fock)
        .create(DEFAULT_FOCK_DATASET)
        .unwrap();
    group
        .new_dataset_builder()
        .with_data(mo_coeff)
        .create(DEFAULT_MO_COEFF_DATASET)
        .unwrap();
}

fn temp_h5(tag: &str) -> PathBuf {
    env::temp_dir().join(format!("efpg_procedures_{tag}_{}.h5", std::process::id()))
}

#[test]
fn test_procedures_run_efp_gamess_with_scf() {
    let path = temp_h5("scf");
    write_efpcalc(&path, &array![1.0, 2.0, 3.0], &array![[0.5, 0.5]]);

    let mut host = StubHost::two_s();
    let options = ProcedureOptions::new().with("HDF5_FILENAME", path.to_string_lossy().to_string());
    let wfn = run_efp_gamess(&mut host, "EFP_GAMESS", None, &options).unwrap();
    assert_eq!(host.n_scf, 1);
    assert_eq!(wfn.fock_alpha(), &array![[1.0, 2.0], [2.0, 3.0]]);
    assert_eq!(wfn.coefficients_alpha(), &array![[0.5], [0.5]]);
    fs::remove_file(path).unwrap();
}

#[test]
fn test_procedures_run_efp_gamess_with_ref_wfn() {
    let path = temp_h5("ref");
    // Pure p shell; GAMESS order x y z, host order z x y.
    write_efpcalc(
        &path,
        &array![1.0, 0.0, 2.0, 0.0, 0.0, 3.0],
        &array![[0.1, 0.2, 0.7]],
    );

    let mut host = StubHost::two_s();
    let ref_wfn = BasicWavefunction::new(BasisAngularOrder::new(&[BasisShell::host(1, true)]), 1);
    let options = ProcedureOptions::new()
        .with("print", 0_i64)
        .with("hdf5_filename", path.to_string_lossy().to_string());
    let wfn = run_efp_gamess(&mut host, "efp_gamess", Some(ref_wfn), &options).unwrap();
    assert_eq!(host.n_scf, 0);
    assert_abs_diff_eq!(wfn.coefficients_alpha()[(0, 0)], 0.7, epsilon = 1e-14);
    assert_abs_diff_eq!(wfn.coefficients_alpha()[(1, 0)], 0.1, epsilon = 1e-14);
    assert_abs_diff_eq!(wfn.coefficients_alpha()[(2, 0)], 0.2, epsilon = 1e-14);
    assert_abs_diff_eq!(wfn.fock_alpha()[(0, 0)], 3.0, epsilon = 1e-14);
    assert_abs_diff_eq!(wfn.fock_alpha()[(1, 1)], 1.0, epsilon = 1e-14);
    fs::remove_file(path).unwrap();
}

#[test]
#[serial]
fn test_procedures_run_efp_gamess_default_filename() {
    let dir = env::temp_dir().join(format!("efpg_procedures_cwd_{}", std::process::id()));
    fs::create_dir_all(&dir).unwrap();
    write_efpcalc(
        &dir.join("form.h5"),
        &array![4.0, 1.0, 5.0],
        &array![[1.0, 0.0]],
    );

    let cwd = env::current_dir().unwrap();
    env::set_current_dir(&dir).unwrap();
    let mut host = StubHost::two_s();
    let res = run_efp_gamess(&mut host, "efp_gamess", None, &ProcedureOptions::new());
    env::set_current_dir(cwd).unwrap();

    let wfn = res.unwrap();
    assert_eq!(wfn.fock_alpha(), &array![[4.0, 1.0], [1.0, 5.0]]);
    assert_eq!(wfn.coefficients_alpha(), &array![[1.0], [0.0]]);
    fs::remove_dir_all(dir).unwrap();
}

#[test]
fn test_procedures_run_efp_gamess_missing_file() {
    let path = temp_h5("absent");
    let mut host = StubHost::two_s();
    let options = ProcedureOptions::new().with("hdf5_filename", path.to_string_lossy().to_string());
    let err = run_efp_gamess(&mut host, "efp_gamess", None, &options).unwrap_err();
    assert_eq!(
        err.downcast_ref::<EfpGamessError>(),
        Some(&EfpGamessError::MissingInputFile(path))
    );
}

#[test]
fn test_procedures_run_efp_gamess_invalid_options() {
    let mut host = StubHost::two_s();

    let options = ProcedureOptions::new().with("print", "loud");
    let err = run_efp_gamess(&mut host, "efp_gamess", None, &options).unwrap_err();
    assert!(matches!(
        err.downcast_ref::<EfpGamessError>(),
        Some(EfpGamessError::InvalidOption { .. })
    ));

    let options = ProcedureOptions::new().with("print", -1_i64);
    let err = run_efp_gamess(&mut host, "efp_gamess", None, &options).unwrap_err();
    assert!(matches!(
        err.downcast_ref::<EfpGamessError>(),
        Some(EfpGamessError::InvalidOption { .. })
    ));

    let options = ProcedureOptions::new().with("hdf5_filename", true);
    let err = run_efp_gamess(&mut host, "efp_gamess", None, &options).unwrap_err();
    assert!(matches!(
        err.downcast_ref::<EfpGamessError>(),
        Some(EfpGamessError::InvalidOption { .. })
    ));

    // Options are validated before any SCF is run.
    assert_eq!(host.n_scf, 0);
}

#[test]
fn test_procedures_register_procedures() {
    let path = temp_h5("table");
    write_efpcalc(&path, &array![1.0, 2.0, 3.0], &array![[0.5, 0.5]]);

    let mut table = ProcedureTable::<StubHost>::new();
    register_procedures(&mut table);
    assert!(table.contains(ComputationKind::Energy, "efp_gamess"));
    assert!(table.contains(ComputationKind::Energy, "EFP_GAMESS"));
    assert!(!table.contains(ComputationKind::Energy, "efp_gamess_gradient"));

    let mut host = StubHost::two_s();
    let options = ProcedureOptions::new().with("hdf5_filename", path.to_string_lossy().to_string());
    let wfn = table
        .call(&mut host, ComputationKind::Energy, "Efp_Gamess", None, &options)
        .unwrap();
    assert_eq!(wfn.fock_alpha(), &array![[1.0, 2.0], [2.0, 3.0]]);

    let err = table
        .call(&mut host, ComputationKind::Energy, "efp_gamess_gradient", None, &options)
        .unwrap_err();
    assert_eq!(
        err.downcast_ref::<EfpGamessError>(),
        Some(&EfpGamessError::UnknownProcedure(
            "efp_gamess_gradient".to_string()
        ))
    );
    fs::remove_file(path).unwrap();
}
