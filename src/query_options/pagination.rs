//! Limit and offset

/// Limit and offset resolved from find options
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Pagination {
    pub limit: Option<u64>,
    pub offset: Option<u64>,
}

impl Pagination {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_limit(mut self, limit: u64) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn with_offset(mut self, offset: u64) -> Self {
        self.offset = Some(offset);
        self
    }

    /// Build from raw numbers; non-finite or negative values are dropped
    pub fn from_numbers(limit: Option<f64>, offset: Option<f64>) -> Self {
        Self {
            limit: limit.and_then(whole),
            offset: offset.and_then(whole),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.limit.is_none() && self.offset.is_none()
    }
}

fn whole(n: f64) -> Option<u64> {
    if n.is_finite() && n >= 0.0 {
        Some(n.trunc() as u64)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_numbers() {
        assert_eq!(
            Pagination::from_numbers(Some(10.7), Some(0.0)),
            Pagination::new().with_limit(10).with_offset(0)
        );
        assert!(Pagination::from_numbers(Some(-1.0), Some(f64::NAN)).is_empty());
        assert!(Pagination::from_numbers(Some(f64::INFINITY), None).is_empty());
    }
}
