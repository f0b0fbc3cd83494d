use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use hdf5;
use ndarray::{array, Array1, Array2};

use crate::error::EfpGamessError;
use crate::interfaces::gamess::{
    EfpCalcSource, GamessH5Source, DEFAULT_FOCK_DATASET, DEFAULT_MO_COEFF_DATASET,
};

fn temp_h5(tag: &str) -> PathBuf {
    env::temp_dir().join(format!("efpg_hdf5_{tag}_{}.h5", std::process::id()))
}

fn write_efpcalc(path: &Path, fock: Option<&Array1<f64>>, mo_coeff: Option<&Array2<f64>>) {
    let f = hdf5::File::create(path).unwrap();
    let group = f.create_group("EFPcalc").unwrap();
    if let Some(fock) = fock {
        group
            .new_dataset_builder()
            .with_data(fock)
            .create(DEFAULT_FOCK_DATASET)
            .unwrap();
    }
    if let Some(mo_coeff) = mo_coeff {
        group
            .new_dataset_builder()
            .with_data(mo_coeff)
            .create(DEFAULT_MO_COEFF_DATASET)
            .unwrap();
    }
}

#[test]
fn test_interfaces_gamess_hdf5_read() {
    let path = temp_h5("read");
    let fock = array![1.0, 2.0, 3.0];
    let mo_coeff = array![[0.5, 0.5]];
    write_efpcalc(&path, Some(&fock), Some(&mo_coeff));

    let source = GamessH5Source::from_path(&path);
    let efp_calc = source.read_efp_calc().unwrap();
    assert_eq!(efp_calc.fock_packed, fock);
    assert_eq!(efp_calc.mo_coefficients, mo_coeff);
    fs::remove_file(path).unwrap();
}

#[test]
fn test_interfaces_gamess_hdf5_custom_names() {
    let path = temp_h5("custom");
    {
        let f = hdf5::File::create(&path).unwrap();
        let group = f.create_group("results").unwrap();
        group
            .new_dataset_builder()
            .with_data(&array![4.0])
            .create("fock")
            .unwrap();
        group
            .new_dataset_builder()
            .with_data(&array![[1.0]])
            .create("coefficients")
            .unwrap();
    }
    let source = GamessH5Source::builder()
        .path(&path)
        .group("results")
        .fock_dataset("fock")
        .mo_coefficients_dataset("coefficients")
        .build()
        .unwrap();
    let efp_calc = source.read_efp_calc().unwrap();
    assert_eq!(efp_calc.fock_packed, array![4.0]);
    assert_eq!(efp_calc.mo_coefficients, array![[1.0]]);
    fs::remove_file(path).unwrap();
}

#[test]
fn test_interfaces_gamess_hdf5_missing_file() {
    let path = temp_h5("missing");
    let source = GamessH5Source::from_path(&path);
    assert_eq!(
        source.read_efp_calc(),
        Err(EfpGamessError::MissingInputFile(path))
    );
}

#[test]
fn test_interfaces_gamess_hdf5_missing_dataset() {
    let path = temp_h5("no_mo");
    write_efpcalc(&path, Some(&array![1.0, 2.0, 3.0]), None);
    let source = GamessH5Source::from_path(&path);
    assert_eq!(
        source.read_efp_calc(),
        Err(EfpGamessError::MissingDataset {
            group: "EFPcalc".to_string(),
            dataset: "MO_coeff".to_string(),
        })
    );
    fs::remove_file(path).unwrap();
}

#[test]
fn test_interfaces_gamess_hdf5_missing_group() {
    let path = temp_h5("no_group");
    write_efpcalc(&path, None, None);
    let source = GamessH5Source::builder()
        .path(&path)
        .group("EFPcalc2")
        .build()
        .unwrap();
    assert_eq!(
        source.read_efp_calc(),
        Err(EfpGamessError::MissingDataset {
            group: "EFPcalc2".to_string(),
            dataset: String::new(),
        })
    );
    fs::remove_file(path).unwrap();
}

#[test]
fn test_interfaces_gamess_hdf5_malformed_coefficients() {
    let path = temp_h5("flat_mo");
    {
        let f = hdf5::File::create(&path).unwrap();
        let group = f.create_group("EFPcalc").unwrap();
        group
            .new_dataset_builder()
            .with_data(&array![1.0, 2.0, 3.0])
            .create(DEFAULT_FOCK_DATASET)
            .unwrap();
        group
            .new_dataset_builder()
            .with_data(&array![0.5, 0.5])
            .create(DEFAULT_MO_COEFF_DATASET)
            .unwrap();
    }
    let source = GamessH5Source::from_path(&path);
    assert!(matches!(
        source.read_efp_calc(),
        Err(EfpGamessError::MalformedInput(_))
    ));
    fs::remove_file(path).unwrap();
}
