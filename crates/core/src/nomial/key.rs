use std::{
    cmp::Ordering,
    collections::BTreeMap,
    fmt,
    hash::{Hash, Hasher},
    sync::{
        Arc,
        atomic::{AtomicU64, Ordering as AtomicOrdering},
    },
};

use crate::Error;

/// Values keyed by variable.
///
/// Used for substitutions, approximation points, and primal solutions.
/// The `BTreeMap` keeps iteration order deterministic.
pub type VarMap = BTreeMap<VarKey, f64>;

/// Checks that every value in `values` is positive and finite.
///
/// # Errors
///
/// Returns [`Error::InvalidValue`] for the first value that is not.
pub fn check_values(values: &VarMap) -> Result<(), Error> {
    match values.iter().find(|(_, v)| !v.is_finite() || **v <= 0.0) {
        Some((key, &value)) => Err(Error::InvalidValue {
            key: key.clone(),
            value,
        }),
        None => Ok(()),
    }
}

static NEXT_SERIAL: AtomicU64 = AtomicU64::new(1);

#[derive(Debug, Clone, PartialEq)]
struct Descr {
    name: String,
    serial: u64,
    sp_init: Option<f64>,
    external: bool,
}

/// An immutable identifier for a scalar decision variable.
///
/// Keys are cheap to clone and compare by their descriptive attributes: the
/// name, plus a serial number for anonymous keys. Metadata such as the
/// [`sp_init`](Self::sp_init) hint does not take part in equality, so two
/// keys built from the same name always refer to the same variable.
#[derive(Clone)]
pub struct VarKey(Arc<Descr>);

impl VarKey {
    /// Creates a named key.
    pub fn new(name: impl Into<String>) -> Self {
        Self(Arc::new(Descr {
            name: name.into(),
            serial: 0,
            sp_init: None,
            external: false,
        }))
    }

    /// Creates a key that is distinct from every other key, named or not.
    pub fn anonymous(prefix: &str) -> Self {
        Self(Arc::new(Descr {
            name: prefix.to_owned(),
            serial: NEXT_SERIAL.fetch_add(1, AtomicOrdering::Relaxed),
            sp_init: None,
            external: false,
        }))
    }

    /// Returns a copy of this key carrying an initial value for SP approximation.
    #[must_use]
    pub fn with_sp_init(self, value: f64) -> Self {
        self.map_descr(|descr| descr.sp_init = Some(value))
    }

    /// Returns a copy of this key marked as produced by an external function.
    #[must_use]
    pub fn with_external(self) -> Self {
        self.map_descr(|descr| descr.external = true)
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.0.name
    }

    /// Initial value used when approximating signomials, if one was given.
    #[must_use]
    pub fn sp_init(&self) -> Option<f64> {
        self.0.sp_init
    }

    #[must_use]
    pub fn is_external(&self) -> bool {
        self.0.external
    }

    #[must_use]
    pub fn is_anonymous(&self) -> bool {
        self.0.serial != 0
    }

    fn identity(&self) -> (&str, u64) {
        (&self.0.name, self.0.serial)
    }

    fn map_descr(self, f: impl FnOnce(&mut Descr)) -> Self {
        let mut descr = Arc::unwrap_or_clone(self.0);
        f(&mut descr);
        Self(Arc::new(descr))
    }
}

impl PartialEq for VarKey {
    fn eq(&self, other: &Self) -> bool {
        self.identity() == other.identity()
    }
}

impl Eq for VarKey {}

impl Hash for VarKey {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.identity().hash(state);
    }
}

impl PartialOrd for VarKey {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for VarKey {
    fn cmp(&self, other: &Self) -> Ordering {
        self.identity().cmp(&other.identity())
    }
}

impl fmt::Display for VarKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_anonymous() {
            write!(f, "{}#{}", self.0.name, self.0.serial)
        } else {
            f.write_str(&self.0.name)
        }
    }
}

impl fmt::Debug for VarKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "VarKey({self})")
    }
}
