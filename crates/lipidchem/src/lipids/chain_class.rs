use std::{
    fmt::{self, Display, Formatter},
    str::FromStr,
};

use crate::{errors::LipidError, ChainClass, Result};

impl ChainClass {
    /// The character written after a chain's numbers, if this class has one
    #[must_use]
    pub const fn marker(self) -> Option<char> {
        match self {
            Self::Plain => None,
            Self::Ether => Some('p'),
            Self::AlphaHydroxy => Some('a'),
            Self::Excluded => Some('x'),
        }
    }
}

impl FromStr for ChainClass {
    type Err = Box<LipidError>;

    fn from_str(s: &str) -> Result<Self> {
        Ok(match s {
            "" => Self::Plain,
            "p" => Self::Ether,
            "a" => Self::AlphaHydroxy,
            "x" => Self::Excluded,
            _ => return Err(Box::new(LipidError::UnknownChainClass(s.to_owned()))),
        })
    }
}

impl Display for ChainClass {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        if let Some(marker) = self.marker() {
            write!(f, "{marker}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn markers_round_trip() {
        for class in [
            ChainClass::Plain,
            ChainClass::Ether,
            ChainClass::AlphaHydroxy,
            ChainClass::Excluded,
        ] {
            assert_eq!(class.to_string().parse::<ChainClass>().unwrap(), class);
        }
        assert_eq!(ChainClass::default(), ChainClass::Plain);
        assert_eq!(ChainClass::Plain.to_string(), "");
    }

    #[test]
    fn unknown_markers() {
        let error = "e".parse::<ChainClass>().unwrap_err();
        assert_eq!(*error, LipidError::UnknownChainClass("e".to_owned()));
        assert!("pp".parse::<ChainClass>().is_err());
        assert!("P".parse::<ChainClass>().is_err());
    }
}
