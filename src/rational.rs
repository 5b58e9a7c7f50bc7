//! Arbitrary-precision fractions kept in canonical form.
//!
//! A [Rational] is always stored with a positive denominator that is coprime to the numerator, so
//! structural equality coincides with numerical equality. Every operation returns a fresh value;
//! nothing is mutated in place.

use ndarray::{Array, ArrayBase, Data, Dimension};
use num_bigint::{BigInt, Sign};
use num_integer::Integer;
use num_traits::{One, Signed, ToPrimitive, Zero};
use std::cmp::Ordering;
use std::fmt;
use std::ops::{Add, Mul, Neg, Sub};
use std::str::FromStr;

use crate::LinalgErr;

/// Largest decimal scale (fraction digits minus exponent, in absolute value) accepted when
/// parsing. Covers every finite `f64`.
pub const MAX_DECIMAL_SCALE: u64 = 10_000;

/// An immutable, exact fraction of two [BigInt]s.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct Rational {
    num: BigInt,
    den: BigInt,
}

impl Rational {
    /// Create the fraction `numerator / denominator` in lowest terms.
    ///
    /// Fails with [LinalgErr::ZeroDenominator] if the denominator is zero. A negative denominator
    /// moves its sign to the numerator.
    pub fn new<N, D>(numerator: N, denominator: D) -> Result<Self, LinalgErr>
    where
        N: Into<BigInt>,
        D: Into<BigInt>,
    {
        let den = denominator.into();
        if den.is_zero() {
            return Err(LinalgErr::ZeroDenominator);
        }
        Ok(Self::reduce(numerator.into(), den))
    }

    /// The integer `n`, as a fraction with denominator one.
    pub fn from_integer<N: Into<BigInt>>(n: N) -> Self {
        Self::canonical(n.into(), BigInt::one())
    }

    /// `0/1`.
    pub fn zero() -> Self {
        Self::from_integer(0)
    }

    /// `1/1`.
    pub fn one() -> Self {
        Self::from_integer(1)
    }

    /// `1/2`.
    pub fn half() -> Self {
        Self::canonical(BigInt::one(), BigInt::from(2))
    }

    /// Normalise the sign and divide out the gcd. The denominator must be non-zero.
    fn reduce(mut num: BigInt, mut den: BigInt) -> Self {
        if den.is_negative() {
            num = -num;
            den = -den;
        }
        let g = num.gcd(&den);
        Self::canonical(num / &g, den / &g)
    }

    /// Wrap a pair that is already known to be in lowest terms with positive denominator.
    fn canonical(num: BigInt, den: BigInt) -> Self {
        debug_assert!(den.is_positive() && num.gcd(&den).is_one());
        Self { num, den }
    }

    /// Carries the sign.
    pub fn numer(&self) -> &BigInt {
        &self.num
    }

    /// Always positive.
    pub fn denom(&self) -> &BigInt {
        &self.den
    }

    /// `true` if the numerator is zero.
    pub fn is_zero(&self) -> bool {
        self.num.sign() == Sign::NoSign
    }

    /// In canonical form, numerator and denominator coincide only for `1/1`.
    pub fn is_one(&self) -> bool {
        self.num == self.den
    }

    /// `true` if this is exactly the integer `value`.
    pub fn is_integer_value(&self, value: i64) -> bool {
        self.den.is_one() && self.num == BigInt::from(value)
    }

    /// `true` if this equals the fraction written in `text` (see [FromStr]).
    pub fn is_str(&self, text: &str) -> Result<bool, LinalgErr> {
        Ok(*self == text.parse::<Rational>()?)
    }

    /// Compare against a float with an absolute tolerance. This is the only place where this
    /// type goes through floating point, so the answer is approximate by nature.
    pub fn is_approximately(&self, value: f64, tolerance: f64) -> bool {
        (value - self.to_f64()).abs() <= tolerance
    }

    /// Nearest float, by dividing the converted numerator and denominator.
    pub fn to_f64(&self) -> f64 {
        let n = self.num.to_f64().unwrap_or(f64::NAN);
        let d = self.den.to_f64().unwrap_or(f64::NAN);
        n / d
    }

    /// -1, 0 or 1 as this is negative, zero or positive.
    pub fn signum(&self) -> i8 {
        match self.num.sign() {
            Sign::Minus => -1,
            Sign::NoSign => 0,
            Sign::Plus => 1,
        }
    }

    /// The absolute value; only the numerator's sign changes.
    pub fn abs(&self) -> Self {
        Self::canonical(self.num.abs(), self.den.clone())
    }

    /// The multiplicative inverse. Fails with [LinalgErr::ZeroReciprocal] for zero.
    pub fn recip(&self) -> Result<Self, LinalgErr> {
        if self.is_zero() {
            return Err(LinalgErr::ZeroReciprocal);
        }
        if self.num.is_negative() {
            Ok(Self::canonical(-&self.den, -&self.num))
        } else {
            Ok(Self::canonical(self.den.clone(), self.num.clone()))
        }
    }

    /// `self / rhs`, failing with [LinalgErr::ZeroReciprocal] if `rhs` is zero.
    pub fn checked_div(&self, rhs: &Rational) -> Result<Self, LinalgErr> {
        Ok(self * &rhs.recip()?)
    }

    /// Parse a plain or scientific decimal such as `-12.5`, `.25` or `3e-2`. The text is split
    /// into an unscaled integer and a power of ten, so the value is represented exactly.
    ///
    /// The power of ten is materialised, so a scale beyond [MAX_DECIMAL_SCALE] digits fails
    /// with [LinalgErr::NumberFormat].
    fn parse_decimal(text: &str) -> Result<Self, LinalgErr> {
        let malformed = || LinalgErr::NumberFormat(text.to_owned());
        let (mantissa, exponent) = match text.find(|c: char| c == 'e' || c == 'E') {
            Some(pos) => (
                &text[..pos],
                text[pos + 1..].parse::<i32>().map_err(|_| malformed())?,
            ),
            None => (text, 0),
        };
        let (negative, unsigned) = split_sign(mantissa);
        let (int_digits, frac_digits) = unsigned.split_once('.').unwrap_or((unsigned, ""));
        if int_digits.is_empty() && frac_digits.is_empty() {
            return Err(malformed());
        }
        if !all_digits(int_digits) || !all_digits(frac_digits) {
            return Err(malformed());
        }
        let mut unscaled: BigInt = format!("{}{}", int_digits, frac_digits)
            .parse()
            .map_err(|_| malformed())?;
        if negative {
            unscaled = -unscaled;
        }

        let scale = frac_digits.len() as i64 - i64::from(exponent);
        if scale.unsigned_abs() > MAX_DECIMAL_SCALE {
            return Err(malformed());
        }
        let power = |e: i64| num_traits::pow(BigInt::from(10), e.unsigned_abs() as usize);
        if scale >= 0 {
            Ok(Self::reduce(unscaled, power(scale)))
        } else {
            Ok(Self::from_integer(unscaled * power(scale)))
        }
    }
}

fn split_sign(text: &str) -> (bool, &str) {
    if let Some(rest) = text.strip_prefix('-') {
        (true, rest)
    } else {
        (false, text.strip_prefix('+').unwrap_or(text))
    }
}

fn all_digits(text: &str) -> bool {
    text.bytes().all(|b| b.is_ascii_digit())
}

/// Parse an optionally signed run of decimal digits.
fn parse_integer(text: &str) -> Result<BigInt, LinalgErr> {
    let (_, digits) = split_sign(text);
    if digits.is_empty() || !all_digits(digits) {
        return Err(LinalgErr::NumberFormat(text.to_owned()));
    }
    text.parse()
        .map_err(|_| LinalgErr::NumberFormat(text.to_owned()))
}

impl FromStr for Rational {
    type Err = LinalgErr;

    /// Accepts either `"n/d"` with two integers, or a decimal number (see
    /// [Rational::parse_decimal]).
    fn from_str(text: &str) -> Result<Self, Self::Err> {
        match text.split_once('/') {
            Some((n, d)) => Rational::new(parse_integer(n)?, parse_integer(d)?),
            None => Rational::parse_decimal(text),
        }
    }
}

impl From<i64> for Rational {
    fn from(n: i64) -> Self {
        Rational::from_integer(n)
    }
}

impl From<BigInt> for Rational {
    fn from(n: BigInt) -> Self {
        Rational::from_integer(n)
    }
}

impl TryFrom<f64> for Rational {
    type Error = LinalgErr;

    /// Goes through the shortest decimal that round-trips to `value`, so `0.2` becomes `1/5`
    /// rather than the binary expansion of the float.
    fn try_from(value: f64) -> Result<Self, Self::Error> {
        if !value.is_finite() {
            return Err(LinalgErr::NumberFormat(value.to_string()));
        }
        Rational::parse_decimal(&value.to_string())
    }
}

/// Convert every entry of a float array with [TryFrom<f64>], keeping the shape.
pub fn rationalize<S, D>(values: &ArrayBase<S, D>) -> Result<Array<Rational, D>, LinalgErr>
where
    S: Data<Elem = f64>,
    D: Dimension,
{
    let mut converted = Vec::with_capacity(values.len());
    for &value in values.iter() {
        converted.push(Rational::try_from(value)?);
    }
    Array::from_shape_vec(values.raw_dim(), converted)
        .map_err(|_| LinalgErr::DimensionMismatch("rationalize", values.len(), values.len()))
}

// arithmetic

impl Add<&Rational> for &Rational {
    type Output = Rational;

    /// `a/b + c/d`. When `gcd(b, d) = 1` (Knuth: about 61% of random pairs) the plain
    /// cross-multiplied sum is already in lowest terms. Otherwise the common factor is divided
    /// out first, which keeps the intermediates small.
    fn add(self, rhs: &Rational) -> Rational {
        let (a, b) = (&self.num, &self.den);
        let (c, d) = (&rhs.num, &rhs.den);

        let d1 = b.gcd(d);
        if d1.is_one() {
            Rational::canonical(a * d + b * c, b * d)
        } else {
            let common = b / &d1;
            let t = a * (d / &d1) + &common * c;
            let d2 = t.gcd(&d1);
            let den = common * (d / &d2);
            Rational::canonical(t / d2, den)
        }
    }
}

impl Sub<&Rational> for &Rational {
    type Output = Rational;

    fn sub(self, rhs: &Rational) -> Rational {
        self + &(-rhs)
    }
}

impl Mul<&Rational> for &Rational {
    type Output = Rational;

    /// `a/b * c/d`, cancelling `gcd(a, d)` and `gcd(b, c)` before multiplying.
    fn mul(self, rhs: &Rational) -> Rational {
        let (a, b) = (&self.num, &self.den);
        let (c, d) = (&rhs.num, &rhs.den);

        let d1 = a.gcd(d);
        let d2 = b.gcd(c);
        let num = (a / &d1) * (c / &d2);
        let den = (b / &d2) * (d / &d1);
        Rational::canonical(num, den)
    }
}

impl Add for Rational {
    type Output = Rational;

    fn add(self, rhs: Rational) -> Rational {
        &self + &rhs
    }
}

impl Add<&Rational> for Rational {
    type Output = Rational;

    fn add(self, rhs: &Rational) -> Rational {
        &self + rhs
    }
}

impl Sub for Rational {
    type Output = Rational;

    fn sub(self, rhs: Rational) -> Rational {
        &self - &rhs
    }
}

impl Sub<&Rational> for Rational {
    type Output = Rational;

    fn sub(self, rhs: &Rational) -> Rational {
        &self - rhs
    }
}

impl Mul for Rational {
    type Output = Rational;

    fn mul(self, rhs: Rational) -> Rational {
        &self * &rhs
    }
}

impl Mul<&Rational> for Rational {
    type Output = Rational;

    fn mul(self, rhs: &Rational) -> Rational {
        &self * rhs
    }
}

impl Neg for &Rational {
    type Output = Rational;

    fn neg(self) -> Rational {
        Rational::canonical(-&self.num, self.den.clone())
    }
}

impl Neg for Rational {
    type Output = Rational;

    fn neg(self) -> Rational {
        Rational::canonical(-self.num, self.den)
    }
}

impl Zero for Rational {
    fn zero() -> Self {
        Rational::zero()
    }

    fn is_zero(&self) -> bool {
        Rational::is_zero(self)
    }
}

impl One for Rational {
    fn one() -> Self {
        Rational::one()
    }

    fn is_one(&self) -> bool {
        Rational::is_one(self)
    }
}

impl Ord for Rational {
    /// Compares `a*d` with `c*b`; both denominators are positive, so no sign flips are needed.
    fn cmp(&self, other: &Self) -> Ordering {
        (&self.num * &other.den).cmp(&(&other.num * &self.den))
    }
}

impl PartialOrd for Rational {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for Rational {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.den.is_one() {
            write!(f, "{}", self.num)
        } else {
            write!(f, "{}/{}", self.num, self.den)
        }
    }
}

impl fmt::Debug for Rational {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Rational({})", self)
    }
}

// tests
