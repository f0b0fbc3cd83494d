use std::env;
use std::fs;

use ndarray::{array, Array2};

use crate::host::ProcedureOptions;
use crate::io::{
    read_efpg_binary, read_efpg_yaml, write_efpg_binary, write_efpg_yaml, EfpGamessFileType,
};

#[test]
fn test_io_binary_matrix() {
    let name = env::temp_dir().join(format!("efpg_io_binary_{}", std::process::id()));
    let fock = array![[1.0, 2.0], [2.0, 3.0]];
    write_efpg_binary(&name, EfpGamessFileType::Wfn, &fock).unwrap();

    let path = name.with_extension("efpg.wfn");
    assert!(path.exists());

    let read_fock: Array2<f64> = read_efpg_binary(&name, EfpGamessFileType::Wfn).unwrap();
    assert_eq!(read_fock, fock);
    fs::remove_file(path).unwrap();
}

#[test]
fn test_io_binary_missing_file() {
    let name = env::temp_dir().join("efpg_io_does_not_exist");
    let res: Result<Array2<f64>, _> = read_efpg_binary(&name, EfpGamessFileType::Wfn);
    assert!(res.is_err());
}

#[test]
fn test_io_yaml_options() {
    let name = env::temp_dir().join(format!("efpg_io_yaml_{}", std::process::id()));
    let options = ProcedureOptions::new()
        .with("print", 2_i64)
        .with("hdf5_filename", "water.h5");
    write_efpg_yaml(&name, &options).unwrap();

    let path = name.with_extension("yml");
    let read_options: ProcedureOptions = read_efpg_yaml(&path).unwrap();
    assert_eq!(read_options, options);
    fs::remove_file(path).unwrap();
}
