/// A ratio of two sample rates.
///
/// Reduced, 44100/48000 becomes 147/160: the polyphase resampler then needs
/// 160 coefficient rows instead of 48000.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IntegerRatio {
    numerator: u32,
    denominator: u32,
}

impl IntegerRatio {
    pub fn new(numerator: u32, denominator: u32) -> Self {
        Self {
            numerator,
            denominator,
        }
    }

    /// Divide both terms by their greatest common divisor.
    pub fn reduce(&mut self) {
        let divisor = gcd(self.numerator, self.denominator);
        if divisor > 1 {
            self.numerator /= divisor;
            self.denominator /= divisor;
        }
    }

    pub fn reduced(mut self) -> Self {
        self.reduce();
        self
    }

    pub fn numerator(&self) -> u32 {
        self.numerator
    }

    pub fn denominator(&self) -> u32 {
        self.denominator
    }
}

fn gcd(mut a: u32, mut b: u32) -> u32 {
    while b != 0 {
        (a, b) = (b, a % b);
    }
    a
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reduce_common_rates() {
        let ratio = IntegerRatio::new(44_100, 48_000).reduced();
        assert_eq!((ratio.numerator(), ratio.denominator()), (147, 160));

        let ratio = IntegerRatio::new(48_000, 8_000).reduced();
        assert_eq!((ratio.numerator(), ratio.denominator()), (6, 1));

        let ratio = IntegerRatio::new(8_000, 11_025).reduced();
        assert_eq!((ratio.numerator(), ratio.denominator()), (320, 441));
    }

    #[test]
    fn test_reduce_coprime_is_noop() {
        let ratio = IntegerRatio::new(7, 13).reduced();
        assert_eq!((ratio.numerator(), ratio.denominator()), (7, 13));
    }

    #[test]
    fn test_reduce_equal_rates() {
        let ratio = IntegerRatio::new(48_000, 48_000).reduced();
        assert_eq!((ratio.numerator(), ratio.denominator()), (1, 1));
    }
}
