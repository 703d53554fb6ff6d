use crate::Charge;

impl Charge {
    #[must_use]
    pub const fn is_zero(self) -> bool {
        self.0 == 0
    }

    #[must_use]
    pub const fn is_positive(self) -> bool {
        self.0 > 0
    }

    #[must_use]
    pub const fn abs(self) -> Self {
        Self(self.0.abs())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn polarity() {
        assert!(Charge(2).is_positive());
        assert!(!Charge(-1).is_positive());
        assert!(!Charge(0).is_positive());
        assert!(Charge(0).is_zero());
        assert_eq!(Charge(-2).abs(), Charge(2));
        assert_eq!(-Charge(1), Charge(-1));
        assert_eq!(Charge(-1).to_string(), "-1");
    }
}
