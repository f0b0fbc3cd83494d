use std::path::PathBuf;

use anyhow::{format_err, Context};

use crate::error::EfpGamessError;

#[test]
fn test_error_invalid_input_classification() {
    assert!(EfpGamessError::MalformedInput("odd length".to_string()).is_invalid_input());
    assert!(EfpGamessError::DimensionMismatch("3 × 4".to_string()).is_invalid_input());
    assert!(EfpGamessError::UnsupportedAngularMomentum(4).is_invalid_input());
    assert!(EfpGamessError::InvalidOption {
        key: "PRINT".to_string(),
        reason: "negative".to_string(),
    }
    .is_invalid_input());

    assert!(!EfpGamessError::MissingInputFile(PathBuf::from("form.h5")).is_invalid_input());
    assert!(!EfpGamessError::MissingDataset {
        group: "EFPcalc".to_string(),
        dataset: "FOCK".to_string(),
    }
    .is_invalid_input());
    assert!(!EfpGamessError::ExternalProviderFailure("no matrix".to_string()).is_invalid_input());
    assert!(!EfpGamessError::UnknownProcedure("efp_gamess".to_string()).is_invalid_input());
}

#[test]
fn test_error_classification_survives_context() {
    let err = Err::<(), _>(format_err!(EfpGamessError::DimensionMismatch(
        "Fock transformation has 5 columns, expected 6.".to_string()
    )))
    .with_context(|| "Unable to execute the basis reordering driver successfully")
    .unwrap_err();
    let root = err
        .downcast_ref::<EfpGamessError>()
        .expect("The root error should remain an `EfpGamessError`.");
    assert!(root.is_invalid_input());
    assert!(format!("{err:#}").contains("Dimension mismatch"));
}
