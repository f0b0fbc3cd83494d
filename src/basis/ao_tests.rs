use crate::basis::ao::{
    basis_angular_order_from_input, BasisAngularOrder, BasisShell, CartOrder, InputBasisShell,
    PureOrder, ShellOrder,
};
use crate::error::EfpGamessError;

#[test]
fn test_ao_basis_cartorder() {
    // =========
    // lcart = 0
    // =========
    let co_0_lex = CartOrder::lex(0);
    assert_eq!(co_0_lex.cart_tuples, vec![(0, 0, 0)]);

    let co_0_gamess = CartOrder::gamess(0).unwrap();
    assert_eq!(co_0_gamess.cart_tuples, vec![(0, 0, 0)]);

    // =========
    // lcart = 1
    // =========
    let co_1_lex = CartOrder::lex(1);
    assert_eq!(co_1_lex.cart_tuples, vec![(1, 0, 0), (0, 1, 0), (0, 0, 1)]);

    let co_1_gamess = CartOrder::gamess(1).unwrap();
    assert_eq!(co_1_gamess, co_1_lex);

    // =========
    // lcart = 2
    // =========
    let co_2_lex = CartOrder::lex(2);
    assert_eq!(
        co_2_lex.cart_tuples,
        vec![
            (2, 0, 0),
            (1, 1, 0),
            (1, 0, 1),
            (0, 2, 0),
            (0, 1, 1),
            (0, 0, 2),
        ]
    );

    let co_2_gamess = CartOrder::gamess(2).unwrap();
    assert!(co_2_gamess.verify());
    assert_eq!(co_2_gamess.index_of(&(1, 1, 0)), Some(3));
    assert_eq!(co_2_gamess.index_of(&(0, 0, 2)), Some(2));
    assert_eq!(co_2_gamess.index_of(&(3, 0, 0)), None);

    // =========
    // lcart = 3
    // =========
    let co_3_lex = CartOrder::lex(3);
    assert_eq!(
        co_3_lex.cart_tuples,
        vec![
            (3, 0, 0),
            (2, 1, 0),
            (2, 0, 1),
            (1, 2, 0),
            (1, 1, 1),
            (1, 0, 2),
            (0, 3, 0),
            (0, 2, 1),
            (0, 1, 2),
            (0, 0, 3),
        ]
    );

    let co_3_gamess = CartOrder::gamess(3).unwrap();
    assert!(co_3_gamess.verify());
    let gamess_positions = co_3_lex
        .iter()
        .map(|tuple| co_3_gamess.index_of(tuple).unwrap())
        .collect::<Vec<_>>();
    assert_eq!(gamess_positions, vec![0, 3, 4, 5, 9, 7, 1, 6, 8, 2]);

    // =========
    // lcart = 4
    // =========
    assert_eq!(
        CartOrder::gamess(4),
        Err(EfpGamessError::UnsupportedAngularMomentum(4))
    );
}

#[test]
fn test_ao_basis_cart_tuple_to_str() {
    let co_2_gamess = CartOrder::gamess(2).unwrap();
    assert_eq!(
        ShellOrder::Cart(co_2_gamess).to_string(),
        "Cart (xx, yy, zz, xy, xz, yz)"
    );
}

#[test]
fn test_ao_basis_pureorder() {
    let po_0 = PureOrder::cossin(0);
    assert_eq!(po_0.iter().cloned().collect::<Vec<_>>(), vec![0]);

    let po_2 = PureOrder::cossin(2);
    assert!(po_2.verify());
    assert_eq!(po_2.iter().cloned().collect::<Vec<_>>(), vec![0, 1, -1, 2, -2]);
    assert_eq!(
        ShellOrder::Pure(po_2).to_string(),
        "Pure (0, 1c, 1s, 2c, 2s)"
    );

    let po_3 = PureOrder::new(&[-3, -2, -1, 0, 1, 2, 3]).unwrap();
    assert_eq!(po_3.lpure, 3);
    assert_eq!(po_3.ncomps(), 7);

    assert!(PureOrder::new(&[0, 1, 1]).is_err());
    assert!(PureOrder::new(&[]).is_err());
}

#[test]
fn test_ao_basis_angular_order_counts() {
    // 6-31G* on a single carbon with Cartesian d.
    let bao_cart = BasisAngularOrder::new(&[
        BasisShell::host(0, false),
        BasisShell::host(0, false),
        BasisShell::host(1, false),
        BasisShell::host(0, false),
        BasisShell::host(1, false),
        BasisShell::host(2, false),
    ]);
    assert_eq!(bao_cart.n_shells(), 6);
    assert_eq!(bao_cart.n_funcs(), 15);
    assert_eq!(bao_cart.n_cart_funcs(), 15);
    assert!(!bao_cart.has_pure());
    assert_eq!(
        bao_cart.shell_boundary_indices(),
        vec![(0, 1), (1, 2), (2, 5), (5, 6), (6, 9), (9, 15)]
    );

    // The same basis with pure d and an added pure f.
    let bao_pure = basis_angular_order_from_input(&[
        InputBasisShell { l: 0, pure: true },
        InputBasisShell { l: 0, pure: true },
        InputBasisShell { l: 1, pure: true },
        InputBasisShell { l: 0, pure: true },
        InputBasisShell { l: 1, pure: true },
        InputBasisShell { l: 2, pure: true },
        InputBasisShell { l: 3, pure: true },
    ])
    .unwrap();
    assert!(bao_pure.has_pure());
    assert_eq!(bao_pure.n_funcs(), 3 + 6 + 5 + 7);
    assert_eq!(bao_pure.n_cart_funcs(), 3 + 6 + 6 + 10);
}

#[test]
#[should_panic]
fn test_ao_basis_shell_inconsistent_rank() {
    let _ = BasisShell::new(2, ShellOrder::Cart(CartOrder::lex(1)));
}

#[test]
fn test_ao_basis_input_shell_unsupported_angular_momentum() {
    let err = basis_angular_order_from_input(&[
        InputBasisShell { l: 0, pure: false },
        InputBasisShell { l: 4, pure: true },
    ])
    .unwrap_err();
    assert_eq!(err, EfpGamessError::UnsupportedAngularMomentum(4));

    // Large ranks are rejected before any Cartesian tuples are counted.
    let err = basis_angular_order_from_input(&[InputBasisShell {
        l: 70000,
        pure: false,
    }])
    .unwrap_err();
    assert_eq!(err, EfpGamessError::UnsupportedAngularMomentum(70000));
}
