use crate::error::SchemeError;

/// A validated code-scheme: the parameters that determine a codebook.
///
/// The standard photogrammetric scheme is 14 bits with no transition
/// filter; the bit count is kept configurable the way the original coding
/// scheme describes it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Scheme {
    name: String,
    bits: u32,
    transitions: Option<u32>,
}

/// Serde-driven scheme configuration matching the TOML format.
#[cfg(feature = "serde")]
#[derive(Debug, Clone, serde::Deserialize)]
pub struct SchemeConfig {
    pub name: String,
    pub bits: u32,
    /// Optional filter: keep only codes with exactly this many 0→1
    /// transitions in the linear bit scan.
    #[serde(default)]
    pub transitions: Option<u32>,
}

impl Scheme {
    /// Construct a scheme, validating the bit count and transition filter.
    pub fn new(
        name: impl Into<String>,
        bits: u32,
        transitions: Option<u32>,
    ) -> Result<Scheme, SchemeError> {
        if bits == 0 {
            return Err(SchemeError::ZeroBits);
        }
        if bits % 2 != 0 {
            return Err(SchemeError::OddBits(bits));
        }
        if bits > 32 {
            return Err(SchemeError::TooManyBits(bits));
        }
        if transitions == Some(0) {
            return Err(SchemeError::ZeroTransitions);
        }
        Ok(Scheme {
            name: name.into(),
            bits,
            transitions,
        })
    }

    /// Parse a TOML scheme config string.
    #[cfg(feature = "serde")]
    pub fn from_toml(toml_str: &str) -> Result<Scheme, SchemeError> {
        let config: SchemeConfig =
            toml::from_str(toml_str).map_err(|e| SchemeError::Config(e.to_string()))?;
        Scheme::new(config.name, config.bits, config.transitions)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn bits(&self) -> u32 {
        self.bits
    }

    pub fn transitions(&self) -> Option<u32> {
        self.transitions
    }

    /// Bit mask covering the low `bits` bits.
    pub fn mask(&self) -> u64 {
        (1u64 << self.bits) - 1
    }
}

// --- Built-in schemes ---

macro_rules! builtin_scheme {
    ($fn_name:ident, $name:literal, $bits:literal) => {
        pub fn $fn_name() -> Scheme {
            Scheme::new($name, $bits, None)
                .expect(concat!("built-in scheme ", $name, " should be valid"))
        }
    };
}

builtin_scheme!(cct8, "cct8", 8);
builtin_scheme!(cct10, "cct10", 10);
builtin_scheme!(cct12, "cct12", 12);
builtin_scheme!(cct14, "cct14", 14);

/// List of all built-in scheme names.
pub const BUILTIN_NAMES: &[&str] = &["cct8", "cct10", "cct12", "cct14"];

/// Look up a built-in scheme by name.
pub fn builtin_scheme(name: &str) -> Option<Scheme> {
    match name {
        "cct8" => Some(cct8()),
        "cct10" => Some(cct10()),
        "cct12" => Some(cct12()),
        "cct14" => Some(cct14()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_names_all_resolve() {
        for name in BUILTIN_NAMES {
            let scheme = builtin_scheme(name).unwrap();
            assert_eq!(scheme.name(), *name);
        }
    }

    #[test]
    fn odd_bits_rejected() {
        assert!(matches!(
            Scheme::new("odd", 13, None),
            Err(SchemeError::OddBits(13))
        ));
    }

    #[test]
    fn zero_bits_rejected() {
        assert!(matches!(Scheme::new("zero", 0, None), Err(SchemeError::ZeroBits)));
    }

    #[test]
    fn oversized_bits_rejected() {
        assert!(matches!(
            Scheme::new("big", 34, None),
            Err(SchemeError::TooManyBits(34))
        ));
    }

    #[test]
    fn zero_transitions_rejected() {
        assert!(matches!(
            Scheme::new("t0", 14, Some(0)),
            Err(SchemeError::ZeroTransitions)
        ));
    }

    #[test]
    fn mask_covers_bit_width() {
        assert_eq!(cct14().mask(), 0x3fff);
    }

    #[cfg(feature = "serde")]
    #[test]
    fn scheme_from_toml() {
        let scheme = Scheme::from_toml("name = \"cct14t4\"\nbits = 14\ntransitions = 4\n").unwrap();
        assert_eq!(scheme.bits(), 14);
        assert_eq!(scheme.transitions(), Some(4));
    }
}
