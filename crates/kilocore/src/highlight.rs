/// Per-byte highlight class of a rendered row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Highlight {
    #[default]
    Normal,
    Number,
    /// Only ever written by the search overlay.
    Match,
}

impl Highlight {
    /// SGR foreground color code used when drawing this class.
    pub fn color(self) -> u8 {
        match self {
            Highlight::Number => 31,
            Highlight::Match => 34,
            Highlight::Normal => 37,
        }
    }
}

/// Classifies every rendered byte. Digits are the only built-in rule.
pub fn classify(render: &[u8]) -> Vec<Highlight> {
    render
        .iter()
        .map(|b| {
            if b.is_ascii_digit() {
                Highlight::Number
            } else {
                Highlight::Normal
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_digits() {
        let hl = classify(b"a1 23");
        assert_eq!(
            hl,
            vec![
                Highlight::Normal,
                Highlight::Number,
                Highlight::Normal,
                Highlight::Number,
                Highlight::Number,
            ]
        );
    }

    #[test]
    fn test_colors() {
        assert_eq!(Highlight::Number.color(), 31);
        assert_eq!(Highlight::Match.color(), 34);
        assert_eq!(Highlight::Normal.color(), 37);
    }
}
