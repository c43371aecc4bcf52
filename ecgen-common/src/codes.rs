//! Fixed-width packing of hierarchy positions into error codes.
//!
//! A code is a `u16` with three bit fields:
//!
//! | field          | bits  | range |
//! |----------------|-------|-------|
//! | module index   | 15..11| 0-31  |
//! | submodule slot | 10..6 | 0-31  |
//! | error index    | 5..0  | 0-63  |
//!
//! The module index is the 0-based position of the module among all
//! modules in declaration order. The submodule slot is 0 for errors
//! declared directly on a module, and the 1-based position within the
//! parent's submodule list otherwise. The error index is the 0-based
//! position within the containing `errors` list.
//!
//! These widths are part of the generated artifact's contract: consumer
//! code depends on the numeric values staying stable, so they must not
//! change without a coordinated regeneration of every consumer.

use crate::errors::{GenError, GenResult};

/// Numeric type of a generated error code.
pub type ErrorCode = u16;

/// Bits reserved for the module index.
pub const MODULE_BITS: u32 = 5;
/// Bits reserved for the submodule slot.
pub const SUBMODULE_BITS: u32 = 5;
/// Bits reserved for the error index.
pub const ERROR_BITS: u32 = 6;

/// Largest representable module index.
pub const MODULE_MAX: usize = (1 << MODULE_BITS) - 1;
/// Largest representable submodule slot.
pub const SUBMODULE_MAX: usize = (1 << SUBMODULE_BITS) - 1;
/// Largest representable error index.
pub const ERROR_MAX: usize = (1 << ERROR_BITS) - 1;

/// A decoded hierarchy position.
///
/// `encode` and `decode` are mutual inverses over in-range points, which
/// makes codes invertible for diagnostics and guarantees two distinct
/// positions never collide.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CodePoint {
    /// 0-based module position.
    pub module: usize,
    /// 0 for module-level errors, 1-based submodule position otherwise.
    pub submodule: usize,
    /// 0-based position within the containing `errors` list.
    pub error: usize,
}

impl CodePoint {
    /// Packs this position into a code.
    ///
    /// Fails with [`GenError::Overflow`] when any field exceeds its bit
    /// width, naming the field and its maximum.
    pub fn encode(self) -> GenResult<ErrorCode> {
        if self.module > MODULE_MAX {
            return Err(GenError::Overflow {
                field: "module",
                value: self.module,
                max: MODULE_MAX,
            });
        }
        if self.submodule > SUBMODULE_MAX {
            return Err(GenError::Overflow {
                field: "submodule",
                value: self.submodule,
                max: SUBMODULE_MAX,
            });
        }
        if self.error > ERROR_MAX {
            return Err(GenError::Overflow {
                field: "error",
                value: self.error,
                max: ERROR_MAX,
            });
        }

        let code = (self.module as ErrorCode) << (SUBMODULE_BITS + ERROR_BITS)
            | (self.submodule as ErrorCode) << ERROR_BITS
            | self.error as ErrorCode;
        Ok(code)
    }

    /// Unpacks a code back into its hierarchy position. Total: every
    /// `u16` decodes to some point.
    #[must_use]
    pub const fn decode(code: ErrorCode) -> Self {
        Self {
            module: (code >> (SUBMODULE_BITS + ERROR_BITS)) as usize,
            submodule: ((code >> ERROR_BITS) as usize) & SUBMODULE_MAX,
            error: code as usize & ERROR_MAX,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_encode_packs_fields() {
        let point = CodePoint {
            module: 1,
            submodule: 2,
            error: 3,
        };
        assert_eq!(point.encode().unwrap(), (1 << 11) | (2 << 6) | 3);
    }

    #[test]
    fn test_zero_point_is_code_zero() {
        let point = CodePoint {
            module: 0,
            submodule: 0,
            error: 0,
        };
        assert_eq!(point.encode().unwrap(), 0);
    }

    #[test]
    fn test_max_point_is_u16_max() {
        let point = CodePoint {
            module: MODULE_MAX,
            submodule: SUBMODULE_MAX,
            error: ERROR_MAX,
        };
        assert_eq!(point.encode().unwrap(), u16::MAX);
    }

    #[test]
    fn test_module_overflow() {
        let point = CodePoint {
            module: MODULE_MAX + 1,
            submodule: 0,
            error: 0,
        };
        match point.encode() {
            Err(GenError::Overflow { field, value, max }) => {
                assert_eq!(field, "module");
                assert_eq!(value, 32);
                assert_eq!(max, 31);
            }
            other => panic!("expected module overflow, got {:?}", other),
        }
    }

    #[test]
    fn test_submodule_overflow() {
        let point = CodePoint {
            module: 0,
            submodule: SUBMODULE_MAX + 1,
            error: 0,
        };
        assert!(matches!(
            point.encode(),
            Err(GenError::Overflow { field: "submodule", .. })
        ));
    }

    #[test]
    fn test_error_overflow() {
        let point = CodePoint {
            module: 0,
            submodule: 0,
            error: ERROR_MAX + 1,
        };
        assert!(matches!(
            point.encode(),
            Err(GenError::Overflow { field: "error", .. })
        ));
    }

    #[test]
    fn test_distinct_points_never_collide() {
        // Exhaustive over the full field ranges: injectivity is the
        // uniqueness invariant the whole allocator rests on.
        let mut seen = std::collections::HashSet::new();
        for module in 0..=MODULE_MAX {
            for submodule in 0..=SUBMODULE_MAX {
                for error in 0..=ERROR_MAX {
                    let code = CodePoint {
                        module,
                        submodule,
                        error,
                    }
                    .encode()
                    .unwrap();
                    assert!(seen.insert(code), "collision at code {:#06x}", code);
                }
            }
        }
        assert_eq!(seen.len(), 1 << 16);
    }

    proptest! {
        #[test]
        fn prop_decode_inverts_encode(
            module in 0usize..=MODULE_MAX,
            submodule in 0usize..=SUBMODULE_MAX,
            error in 0usize..=ERROR_MAX,
        ) {
            let point = CodePoint { module, submodule, error };
            let code = point.encode().unwrap();
            prop_assert_eq!(CodePoint::decode(code), point);
        }

        #[test]
        fn prop_encode_inverts_decode(code in any::<u16>()) {
            let point = CodePoint::decode(code);
            prop_assert_eq!(point.encode().unwrap(), code);
        }
    }
}
