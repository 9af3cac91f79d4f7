use std::collections::HashMap;

use crate::models::{Cents, Coupon};

/// Coupon lookup, injectable so the code table can be swapped without
/// touching cart logic. Lookup is by exact uppercase code; callers
/// normalize user input before asking.
pub trait CouponRegistry: Send + Sync {
    fn lookup(&self, code: &str) -> Option<Coupon>;
}

/// Fixed in-memory code table.
pub struct StaticCouponRegistry {
    coupons: HashMap<String, Coupon>,
}

impl StaticCouponRegistry {
    pub fn new(coupons: impl IntoIterator<Item = Coupon>) -> Self {
        Self {
            coupons: coupons
                .into_iter()
                .map(|c| (c.code.clone(), c))
                .collect(),
        }
    }

    fn flat(code: &str, discount: Cents) -> Coupon {
        Coupon {
            code: code.to_string(),
            discount,
            free_shipping: false,
        }
    }
}

impl Default for StaticCouponRegistry {
    fn default() -> Self {
        Self::new([
            Self::flat("SAVE10", 1000),
            Self::flat("WELCOME20", 2000),
            Coupon {
                code: "FREESHIP".to_string(),
                discount: 0,
                free_shipping: true,
            },
        ])
    }
}

impl CouponRegistry for StaticCouponRegistry {
    fn lookup(&self, code: &str) -> Option<Coupon> {
        self.coupons.get(code).cloned()
    }
}

/// Result of trying to apply a coupon code. Rejection is a normal
/// outcome, not an error: the previously applied coupon (if any) stays
/// active and the user may retry.
#[derive(Debug, Clone, PartialEq)]
pub enum CouponOutcome {
    Applied(Coupon),
    Rejected,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookup_is_exact_and_case_sensitive() {
        let registry = StaticCouponRegistry::default();
        assert!(registry.lookup("SAVE10").is_some());
        assert!(registry.lookup("save10").is_none());
        assert!(registry.lookup("SAVE1").is_none());
        assert!(registry.lookup("SAVE100").is_none());
    }

    #[test]
    fn default_registry_carries_the_storefront_codes() {
        let registry = StaticCouponRegistry::default();
        assert_eq!(registry.lookup("SAVE10").unwrap().discount, 1000);
        assert_eq!(registry.lookup("WELCOME20").unwrap().discount, 2000);

        let freeship = registry.lookup("FREESHIP").unwrap();
        assert_eq!(freeship.discount, 0);
        assert!(freeship.free_shipping);
    }
}
