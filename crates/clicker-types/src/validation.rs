//! Presence checks for request fields.
//!
//! A field counts as present only when it is set and "truthy": strings must be
//! non-empty, numbers must be non-zero (and not NaN). A `clickReward` of `0`
//! is therefore rejected exactly like a missing one.

pub trait Truthy {
    fn is_truthy(&self) -> bool;
}

impl Truthy for String {
    fn is_truthy(&self) -> bool {
        !self.is_empty()
    }
}

impl Truthy for i64 {
    fn is_truthy(&self) -> bool {
        *self != 0
    }
}

impl Truthy for f64 {
    fn is_truthy(&self) -> bool {
        *self != 0.0 && !self.is_nan()
    }
}

/// Returns the value if it is present and truthy.
pub fn required<T: Truthy>(value: Option<T>) -> Option<T> {
    value.filter(Truthy::is_truthy)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_string_is_missing() {
        assert_eq!(required(Some(String::new())), None);
        assert_eq!(required(Some("u1".to_string())), Some("u1".to_string()));
        assert_eq!(required::<String>(None), None);
    }

    #[test]
    fn zero_is_missing() {
        assert_eq!(required(Some(0i64)), None);
        assert_eq!(required(Some(0.0f64)), None);
        assert_eq!(required(Some(f64::NAN)), None);
    }

    #[test]
    fn negative_numbers_are_present() {
        assert_eq!(required(Some(-5i64)), Some(-5));
        assert_eq!(required(Some(0.5f64)), Some(0.5));
    }
}
