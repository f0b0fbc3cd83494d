//! Atomic-orbital basis functions and their ordering conventions.

use std::cmp::Ordering;
use std::collections::HashSet;
use std::fmt;
use std::slice::Iter;

use anyhow::{self, ensure, format_err};
use derive_builder::Builder;
use itertools::Itertools;
use serde::{Deserialize, Serialize};

use crate::error::EfpGamessError;

#[cfg(test)]
#[path = "ao_tests.rs"]
mod ao_tests;

/// Labels of the angular momenta supported by the GAMESS reordering.
pub const ANGMOM_LABELS: [&str; 4] = ["S", "P", "D", "F"];

// -------------------
// Shell order structs
// -------------------

// ~~~~~~~~~
// PureOrder
// ~~~~~~~~~

/// Structure to contain information about the ordering of pure Gaussians of a certain rank.
#[derive(Clone, Builder, PartialEq, Eq, Hash)]
pub struct PureOrder {
    /// A sequence of $`m_l`$ values giving the ordering of the pure Gaussians. A positive
    /// $`m_l`$ denotes the cosine-like component and a negative one the sine-like component.
    #[builder(setter(custom))]
    mls: Vec<i32>,

    /// The rank of the pure Gaussians.
    pub lpure: u32,
}

impl PureOrderBuilder {
    fn mls(&mut self, mls: &[i32]) -> &mut Self {
        let lpure = self.lpure.expect("`lpure` has not been set.");
        assert_eq!(mls.len(), (2 * lpure + 1) as usize);
        self.mls = Some(mls.to_vec());
        self
    }
}

impl PureOrder {
    /// Returns a builder to construct a new [`PureOrder`] structure.
    fn builder() -> PureOrderBuilder {
        PureOrderBuilder::default()
    }

    /// Constructs a new [`PureOrder`] structure from its constituting $`m_l`$ values.
    pub fn new(mls: &[i32]) -> Result<Self, anyhow::Error> {
        let lpure = mls
            .iter()
            .map(|m| m.unsigned_abs())
            .max()
            .ok_or_else(|| format_err!("No m values found."))?;
        ensure!(
            mls.len() == (2 * lpure + 1) as usize,
            "Unexpected number of m values for lpure = {lpure}."
        );
        let pure_order = PureOrder::builder()
            .lpure(lpure)
            .mls(mls)
            .build()
            .map_err(|err| format_err!(err))?;
        ensure!(pure_order.verify(), "Invalid `PureOrder`.");
        Ok(pure_order)
    }

    /// Constructs a new [`PureOrder`] structure for a specified rank with cosine/sine order,
    /// *i.e.* $`0, 1c, 1s, 2c, 2s, \ldots`$. This is the order the host program uses for real solid
    /// harmonics.
    ///
    /// # Arguments
    ///
    /// * `lpure` - The required pure Gaussian rank.
    #[must_use]
    pub fn cossin(lpure: u32) -> Self {
        let lpure_i32 = i32::try_from(lpure).expect("`lpure` cannot be converted to `i32`.");
        let mls = (0..=lpure_i32)
            .flat_map(|absm| {
                if absm == 0 {
                    vec![0]
                } else {
                    vec![absm, -absm]
                }
            })
            .collect_vec();
        Self::builder()
            .lpure(lpure)
            .mls(&mls)
            .build()
            .expect("Unable to construct a `PureOrder` structure with cosine/sine order.")
    }

    /// Verifies if this [`PureOrder`] struct is valid.
    #[must_use]
    pub fn verify(&self) -> bool {
        let mls_set = self.mls.iter().collect::<HashSet<_>>();
        let lpure = self.lpure;
        mls_set.len() == self.ncomps() && mls_set.iter().all(|m| m.unsigned_abs() <= lpure)
    }

    /// Iterates over the constituent $`m_l`$ values.
    pub fn iter(&'_ self) -> Iter<'_, i32> {
        self.mls.iter()
    }

    /// Returns the number of pure components in the shell.
    pub fn ncomps(&self) -> usize {
        2 * self.lpure as usize + 1
    }
}

impl fmt::Display for PureOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Pure rank: {}", self.lpure)?;
        writeln!(f, "Order:")?;
        for m in self.iter() {
            writeln!(f, "  {}", m_to_str(*m))?;
        }
        Ok(())
    }
}

impl fmt::Debug for PureOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Pure rank: {}", self.lpure)?;
        writeln!(f, "Order:")?;
        for m in self.iter() {
            writeln!(f, "  {m:?}")?;
        }
        Ok(())
    }
}

/// Translates an $`m_l`$ value to its cosine/sine label, *e.g.* `2c` or `1s`.
fn m_to_str(m: i32) -> String {
    match m.cmp(&0) {
        Ordering::Greater => format!("{m}c"),
        Ordering::Equal => "0".to_string(),
        Ordering::Less => format!("{}s", m.unsigned_abs()),
    }
}

// ~~~~~~~~~
// CartOrder
// ~~~~~~~~~

/// Structure to contain information about the ordering of Cartesian Gaussians of a certain rank.
#[derive(Clone, Builder, PartialEq, Eq, Hash)]
pub struct CartOrder {
    /// A sequence of $`(l_x, l_y, l_z)`$ tuples giving the ordering of the Cartesian Gaussians.
    #[builder(setter(custom))]
    pub cart_tuples: Vec<(u32, u32, u32)>,

    /// The rank of the Cartesian Gaussians.
    pub lcart: u32,
}

impl CartOrderBuilder {
    fn cart_tuples(&mut self, cart_tuples: &[(u32, u32, u32)]) -> &mut Self {
        let lcart = self.lcart.expect("`lcart` has not been set.");
        assert!(
            cart_tuples.iter().all(|(lx, ly, lz)| lx + ly + lz == lcart),
            "Inconsistent total Cartesian orders between components."
        );
        assert_eq!(
            cart_tuples.len(),
            ((lcart + 1) * (lcart + 2)).div_euclid(2) as usize,
            "Unexpected number of components for `lcart` = {}.",
            lcart
        );
        self.cart_tuples = Some(cart_tuples.to_vec());
        self
    }
}

impl CartOrder {
    /// Returns a builder to construct a new [`CartOrder`] structure.
    fn builder() -> CartOrderBuilder {
        CartOrderBuilder::default()
    }

    /// Constructs a new [`CartOrder`] structure for a specified rank with lexicographic order.
    /// This is the order the host program uses for Cartesian shells.
    ///
    /// # Arguments
    ///
    /// * `lcart` - The required Cartesian Gaussian rank.
    #[must_use]
    pub fn lex(lcart: u32) -> Self {
        let mut cart_tuples =
            Vec::with_capacity(((lcart + 1) * (lcart + 2)).div_euclid(2) as usize);
        for lx in (0..=lcart).rev() {
            for ly in (0..=(lcart - lx)).rev() {
                cart_tuples.push((lx, ly, lcart - lx - ly));
            }
        }
        Self::builder()
            .lcart(lcart)
            .cart_tuples(&cart_tuples)
            .build()
            .expect("Unable to construct a `CartOrder` structure with lexicographic order.")
    }

    /// Constructs a new [`CartOrder`] structure for a specified rank with GAMESS order.
    ///
    /// # Arguments
    ///
    /// * `lcart` - The required Cartesian Gaussian rank up to 3.
    ///
    /// # Errors
    ///
    /// Errors if `lcart` is greater than 3.
    pub fn gamess(lcart: u32) -> Result<Self, EfpGamessError> {
        let cart_tuples: Vec<(u32, u32, u32)> = match lcart {
            0 => vec![(0, 0, 0)],
            1 => vec![(1, 0, 0), (0, 1, 0), (0, 0, 1)],
            2 => vec![
                (2, 0, 0),
                (0, 2, 0),
                (0, 0, 2),
                (1, 1, 0),
                (1, 0, 1),
                (0, 1, 1),
            ],
            3 => vec![
                (3, 0, 0),
                (0, 3, 0),
                (0, 0, 3),
                (2, 1, 0),
                (2, 0, 1),
                (1, 2, 0),
                (0, 2, 1),
                (1, 0, 2),
                (0, 1, 2),
                (1, 1, 1),
            ],
            _ => return Err(EfpGamessError::UnsupportedAngularMomentum(lcart)),
        };
        Ok(Self::builder()
            .lcart(lcart)
            .cart_tuples(&cart_tuples)
            .build()
            .expect("Unable to construct a `CartOrder` structure with GAMESS order."))
    }

    /// Verifies if this [`CartOrder`] struct is valid.
    #[must_use]
    pub fn verify(&self) -> bool {
        let cart_tuples_set = self.cart_tuples.iter().collect::<HashSet<_>>();
        let lcart = self.lcart;
        cart_tuples_set.len() == self.ncomps()
            && cart_tuples_set
                .iter()
                .all(|(lx, ly, lz)| lx + ly + lz == lcart)
    }

    /// Iterates over the constituent tuples.
    pub fn iter(&'_ self) -> Iter<'_, (u32, u32, u32)> {
        self.cart_tuples.iter()
    }

    /// Returns the number of Cartesian components in the shell.
    pub fn ncomps(&self) -> usize {
        let lcart = self.lcart as usize;
        ((lcart + 1) * (lcart + 2)).div_euclid(2)
    }

    /// Returns the index of a Cartesian component in this shell, if present.
    pub fn index_of(&self, cart_tuple: &(u32, u32, u32)) -> Option<usize> {
        self.cart_tuples.iter().position(|tuple| tuple == cart_tuple)
    }
}

impl fmt::Display for CartOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Cartesian rank: {}", self.lcart)?;
        writeln!(f, "Order:")?;
        for cart_tuple in self.iter() {
            writeln!(f, "  {}", cart_tuple_to_str(cart_tuple, true))?;
        }
        Ok(())
    }
}

impl fmt::Debug for CartOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Cartesian rank: {}", self.lcart)?;
        writeln!(f, "Order:")?;
        for cart_tuple in self.iter() {
            writeln!(f, "  {cart_tuple:?}")?;
        }
        Ok(())
    }
}

/// Translates a Cartesian exponent tuple to a human-understandable string.
///
/// # Arguments
///
/// * `cart_tuple` - A tuple of $`(l_x, l_y, l_z)`$ specifying the exponents of the Cartesian
///   components of the Cartesian Gaussian.
/// * flat - A flag indicating if the string representation is flat (*e.g.* `xxyz`) or compact
///   (*e.g.* `x^2yz`).
pub(crate) fn cart_tuple_to_str(cart_tuple: &(u32, u32, u32), flat: bool) -> String {
    if cart_tuple.0 + cart_tuple.1 + cart_tuple.2 == 0u32 {
        "1".to_string()
    } else {
        let cart_array = [cart_tuple.0, cart_tuple.1, cart_tuple.2];
        let carts = ["x", "y", "z"];
        cart_array
            .iter()
            .enumerate()
            .map(|(i, &l)| {
                if flat {
                    carts[i].repeat(l as usize)
                } else {
                    match l.cmp(&1) {
                        Ordering::Greater => format!("{}^{l}", carts[i]),
                        Ordering::Equal => carts[i].to_string(),
                        Ordering::Less => String::new(),
                    }
                }
            })
            .collect::<String>()
    }
}

// ----------
// ShellOrder
// ----------

/// Enumerated type to indicate the type of the angular functions in a shell and how they are
/// ordered.
#[derive(Clone, PartialEq, Eq, Hash, Debug)]
pub enum ShellOrder {
    /// This variant indicates that the angular functions are real solid harmonics. The associated
    /// value is a [`PureOrder`] struct containing the order of these functions.
    Pure(PureOrder),

    /// This variant indicates that the angular functions are Cartesian functions. The associated
    /// value is a [`CartOrder`] struct containing the order of these functions.
    Cart(CartOrder),
}

impl fmt::Display for ShellOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ShellOrder::Pure(pure_order) => write!(
                f,
                "Pure ({})",
                pure_order.iter().map(|m| m_to_str(*m)).join(", ")
            ),
            ShellOrder::Cart(cart_order) => write!(
                f,
                "Cart ({})",
                cart_order
                    .iter()
                    .map(|cart_tuple| cart_tuple_to_str(cart_tuple, true))
                    .join(", ")
            ),
        }
    }
}

// ----------
// BasisShell
// ----------

/// Structure representing a shell in an atomic-orbital basis set.
#[derive(Clone, Builder, PartialEq, Eq, Hash, Debug)]
pub struct BasisShell {
    /// A non-negative integer indicating the angular momentum of the shell.
    #[builder(setter(custom))]
    pub l: u32,

    /// An enum indicating the type of the angular functions in a shell and how they are ordered.
    #[builder(setter(custom))]
    pub shell_order: ShellOrder,
}

impl BasisShellBuilder {
    fn l(&mut self, l: u32) -> &mut Self {
        match self.shell_order.as_ref() {
            Some(ShellOrder::Pure(pure_order)) => assert_eq!(pure_order.lpure, l),
            Some(ShellOrder::Cart(cart_order)) => assert_eq!(cart_order.lcart, l),
            None => {}
        }
        self.l = Some(l);
        self
    }

    fn shell_order(&mut self, shl_ord: ShellOrder) -> &mut Self {
        match (&shl_ord, self.l) {
            (ShellOrder::Pure(pure_order), Some(l)) => assert_eq!(pure_order.lpure, l),
            (ShellOrder::Cart(cart_order), Some(l)) => assert_eq!(cart_order.lcart, l),
            _ => {}
        }
        self.shell_order = Some(shl_ord);
        self
    }
}

impl BasisShell {
    /// Returns a builder to construct a new [`BasisShell`].
    fn builder() -> BasisShellBuilder {
        BasisShellBuilder::default()
    }

    /// Constructs a new [`BasisShell`].
    ///
    /// # Arguments
    ///
    /// * `l` - The angular momentum of this shell.
    /// * `shl_ord` - A [`ShellOrder`] structure specifying the type and ordering of the basis
    ///   functions in this shell.
    pub fn new(l: u32, shl_ord: ShellOrder) -> Self {
        BasisShell::builder()
            .l(l)
            .shell_order(shl_ord)
            .build()
            .expect("Unable to construct a `BasisShell`.")
    }

    /// Constructs a new [`BasisShell`] in the host convention: cosine/sine order if `pure`,
    /// lexicographic Cartesian order otherwise.
    pub fn host(l: u32, pure: bool) -> Self {
        if pure {
            BasisShell::new(l, ShellOrder::Pure(PureOrder::cossin(l)))
        } else {
            BasisShell::new(l, ShellOrder::Cart(CartOrder::lex(l)))
        }
    }

    /// Returns `true` if this shell consists of real solid harmonics.
    pub fn is_pure(&self) -> bool {
        matches!(self.shell_order, ShellOrder::Pure(_))
    }

    /// The number of basis functions in this shell.
    pub fn n_funcs(&self) -> usize {
        let lsize = self.l as usize;
        match self.shell_order {
            ShellOrder::Pure(_) => 2 * lsize + 1,
            ShellOrder::Cart(_) => ((lsize + 1) * (lsize + 2)).div_euclid(2),
        }
    }

    /// The number of Cartesian functions spanning this shell, regardless of whether the shell
    /// itself is pure or Cartesian.
    pub fn n_cart_funcs(&self) -> usize {
        let lsize = self.l as usize;
        ((lsize + 1) * (lsize + 2)).div_euclid(2)
    }
}

// -----------------
// BasisAngularOrder
// -----------------

/// Structure containing the ordered shells of an atomic-orbital basis set, as needed to map one
/// basis-function ordering convention onto another.
#[derive(Clone, Builder, PartialEq, Eq, Debug)]
pub struct BasisAngularOrder {
    /// An ordered sequence of [`BasisShell`] in the order the shells are defined in the basis.
    #[builder(setter(custom))]
    pub(crate) basis_shells: Vec<BasisShell>,
}

impl BasisAngularOrderBuilder {
    pub(crate) fn basis_shells(&mut self, bss: &[BasisShell]) -> &mut Self {
        self.basis_shells = Some(bss.to_vec());
        self
    }
}

impl BasisAngularOrder {
    /// Returns a builder to construct a new [`BasisAngularOrder`].
    #[must_use]
    pub(crate) fn builder() -> BasisAngularOrderBuilder {
        BasisAngularOrderBuilder::default()
    }

    /// Constructs a new [`BasisAngularOrder`] structure from the constituting [`BasisShell`]s.
    pub fn new(bss: &[BasisShell]) -> Self {
        BasisAngularOrder::builder()
            .basis_shells(bss)
            .build()
            .expect("Unable to construct a `BasisAngularOrder`.")
    }

    /// The number of shells in the basis.
    pub fn n_shells(&self) -> usize {
        self.basis_shells.len()
    }

    /// The number of basis functions in this basis.
    pub fn n_funcs(&self) -> usize {
        self.basis_shells.iter().map(BasisShell::n_funcs).sum()
    }

    /// The number of Cartesian functions spanning this basis.
    pub fn n_cart_funcs(&self) -> usize {
        self.basis_shells.iter().map(BasisShell::n_cart_funcs).sum()
    }

    /// Returns `true` if any shell in this basis consists of real solid harmonics.
    pub fn has_pure(&self) -> bool {
        self.basis_shells.iter().any(BasisShell::is_pure)
    }

    /// The ordered tuples of 0-based function indices indicating the starting (inclusive) and
    /// ending (exclusive) positions of the shells in this basis.
    pub fn shell_boundary_indices(&self) -> Vec<(usize, usize)> {
        self.basis_shells
            .iter()
            .scan(0, |acc, shell| {
                let start_index = *acc;
                *acc += shell.n_funcs();
                Some((start_index, *acc))
            })
            .collect::<Vec<_>>()
    }

    /// An iterator over the constituent [`BasisShell`]s in this basis.
    pub fn basis_shells(&self) -> impl Iterator<Item = &BasisShell> + '_ {
        self.basis_shells.iter()
    }
}

impl fmt::Display for BasisAngularOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Number of shells: {}", self.n_shells())?;
        writeln!(f, "Number of basis functions: {}", self.n_funcs())?;
        writeln!(f, "Number of Cartesian functions: {}", self.n_cart_funcs())?;
        for (shell, (start, end)) in self
            .basis_shells
            .iter()
            .zip(self.shell_boundary_indices().iter())
        {
            writeln!(
                f,
                "  {:>1} [{start:>4}, {end:>4}): {}",
                ANGMOM_LABELS
                    .get(shell.l as usize)
                    .map(|label| label.to_string())
                    .unwrap_or_else(|| format!("l={}", shell.l)),
                shell.shell_order
            )?;
        }
        Ok(())
    }
}

// ----------------
// Input shells
// ----------------

/// Serialisable/deserialisable description of a shell in the host convention, as given in input
/// files and across language bindings.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct InputBasisShell {
    /// The angular momentum of the shell.
    pub l: u32,

    /// Boolean indicating if the shell consists of real solid harmonics.
    #[serde(default)]
    pub pure: bool,
}

impl TryFrom<&InputBasisShell> for BasisShell {
    type Error = EfpGamessError;

    /// Only angular momenta with a label in [`ANGMOM_LABELS`] are accepted.
    fn try_from(inp: &InputBasisShell) -> Result<Self, Self::Error> {
        if inp.l as usize >= ANGMOM_LABELS.len() {
            return Err(EfpGamessError::UnsupportedAngularMomentum(inp.l));
        }
        Ok(BasisShell::host(inp.l, inp.pure))
    }
}

/// Builds a [`BasisAngularOrder`] in the host convention from input shell descriptions.
///
/// # Errors
///
/// Errors with [`EfpGamessError::UnsupportedAngularMomentum`] if any shell has an angular
/// momentum above that of an f shell.
pub fn basis_angular_order_from_input(
    shells: &[InputBasisShell],
) -> Result<BasisAngularOrder, EfpGamessError> {
    let basis_shells = shells
        .iter()
        .map(BasisShell::try_from)
        .collect::<Result<Vec<_>, _>>()?;
    Ok(BasisAngularOrder::new(&basis_shells))
}
