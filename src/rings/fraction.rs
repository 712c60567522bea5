use crate::error::{Error, Result};
use num_bigint::BigInt;
use num_integer::Integer;
use num_traits::{FromPrimitive, One, Signed, ToPrimitive, Zero};
use std::cmp::Ordering;
use std::fmt;
use std::fmt::Display;
use std::ops;
use std::ops::{Add, Div, Mul, Sub};
use std::str::FromStr;

/// An exact fraction of two arbitrary precision integers.
///
/// Values are always stored reduced: `gcd(|num|, den) == 1` and `den > 0`,
/// with the sign carried by the numerator. A fraction is never mutated
/// after construction, every operation builds a new reduced value.
#[derive(Debug, Clone, Hash)]
pub struct Fraction {
    num: BigInt,
    den: BigInt,
}

impl Fraction {
    /// Builds `num / den` in lowest terms.
    ///
    /// Fails with [`Error::DivisionByZero`] when `den` is zero.
    pub fn new(num: impl Into<BigInt>, den: impl Into<BigInt>) -> Result<Self> {
        let den = den.into();
        if den.is_zero() {
            return Err(Error::DivisionByZero);
        }
        Ok(Self::reduced(num.into(), den))
    }

    pub fn from_integer(value: impl Into<BigInt>) -> Self {
        Self {
            num: value.into(),
            den: BigInt::one(),
        }
    }

    // `den` must be nonzero.
    fn reduced(num: BigInt, den: BigInt) -> Self {
        // gcd(0, d) would reduce to 0/±1 anyway, skip the division
        if num.is_zero() {
            return Self::zero();
        }

        let g = num.gcd(&den);
        let num = num / &g;
        let den = den / &g;

        if den.is_negative() {
            return Self {
                num: -num,
                den: -den,
            };
        }
        Self { num, den }
    }

    /// Parses `[-]N[/D]`, whitespace allowed around every token.
    pub fn parse(text: &str) -> Result<Self> {
        text.parse()
    }

    pub fn numer(&self) -> &BigInt {
        &self.num
    }

    pub fn denom(&self) -> &BigInt {
        &self.den
    }

    pub fn is_integer(&self) -> bool {
        self.den.is_one()
    }

    pub fn is_negative(&self) -> bool {
        self.num.is_negative()
    }

    pub fn signum(&self) -> i8 {
        match self.num.sign() {
            num_bigint::Sign::Minus => -1,
            num_bigint::Sign::NoSign => 0,
            num_bigint::Sign::Plus => 1,
        }
    }

    pub fn abs(&self) -> Self {
        Self {
            num: self.num.abs(),
            den: self.den.clone(),
        }
    }

    pub fn recip(&self) -> Result<Self> {
        if self.num.is_zero() {
            return Err(Error::DivisionByZero);
        }
        Ok(Self::reduced(self.den.clone(), self.num.clone()))
    }

    pub fn checked_div(&self, rhs: &Fraction) -> Result<Self> {
        if rhs.num.is_zero() {
            return Err(Error::DivisionByZero);
        }
        Ok(Self::reduced(&self.num * &rhs.den, &self.den * &rhs.num))
    }

    pub fn to_f64(&self) -> Option<f64> {
        if self.is_integer() {
            return self.num.to_f64();
        }
        Some(self.num.to_f64()? / self.den.to_f64()?)
    }

    /// A negative exponent inverts the fraction first, which fails with
    /// [`Error::DivisionByZero`] for zero.
    pub fn pow(&self, exponent: i32) -> Result<Self> {
        let e = exponent.unsigned_abs();
        match exponent.cmp(&0) {
            Ordering::Greater => Ok(Self::reduced(self.num.pow(e), self.den.pow(e))),
            Ordering::Equal => Ok(Self::one()),
            Ordering::Less => {
                if self.num.is_zero() {
                    return Err(Error::DivisionByZero);
                }
                Ok(Self::reduced(self.den.pow(e), self.num.pow(e)))
            }
        }
    }

    /// Raises the fraction to a fractional power `p / q`.
    ///
    /// This is an approximation: the `q`-th roots of numerator and
    /// denominator are taken in `f64`, raised to `|p|` and truncated to
    /// integers before the result is reduced. It is exact only when both
    /// roots are integers. Integer exponents go through [`Fraction::pow`].
    pub fn pow_fraction(&self, exponent: &Fraction) -> Result<Self> {
        if exponent.is_integer() {
            let e = exponent.num.to_i32().ok_or_else(|| {
                Error::InvalidValue(format!("exponent {} out of range", exponent))
            })?;
            return self.pow(e);
        }
        if self.num.is_zero() && exponent.is_negative() {
            return Err(Error::DivisionByZero);
        }

        let root = exponent
            .den
            .to_u32()
            .ok_or_else(|| Error::InvalidValue(format!("root {} out of range", exponent.den)))?;
        let power = exponent
            .num
            .abs()
            .to_i32()
            .ok_or_else(|| Error::InvalidValue(format!("power {} out of range", exponent.num)))?;

        let num = truncate(real_root(&self.num, root)?.powi(power))?;
        let den = truncate(real_root(&self.den, root)?.powi(power))?;

        if exponent.is_negative() {
            Fraction::new(den, num)
        } else {
            Fraction::new(num, den)
        }
    }
}

fn real_root(value: &BigInt, root: u32) -> Result<f64> {
    let x = value
        .to_f64()
        .ok_or_else(|| Error::InvalidValue(format!("{} has no float value", value)))?;
    if x >= 0.0 {
        return Ok(x.powf(1.0 / root as f64));
    }
    if root % 2 == 0 {
        return Err(Error::InvalidValue(format!(
            "even root of negative value {}",
            value
        )));
    }
    Ok(-(-x).powf(1.0 / root as f64))
}

fn truncate(x: f64) -> Result<BigInt> {
    BigInt::from_f64(x.trunc()).ok_or_else(|| Error::InvalidValue(format!("{} is not finite", x)))
}

impl FromStr for Fraction {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let invalid = || Error::Parse(s.to_string());
        let digits = |text: &str| text.find(|c: char| !c.is_ascii_digit()).unwrap_or(text.len());

        let rest = s.trim_start();
        let (negative, rest) = match rest.strip_prefix('-') {
            Some(rest) => (true, rest.trim_start()),
            None => (false, rest),
        };

        let end = digits(rest);
        if end == 0 {
            return Err(invalid());
        }
        let (num, rest) = rest.split_at(end);
        let rest = rest.trim_start();

        let den = if rest.is_empty() {
            "1"
        } else {
            let rest = rest.strip_prefix('/').ok_or_else(invalid)?.trim_start();
            let end = digits(rest);
            if end == 0 || !rest[end..].trim().is_empty() {
                return Err(invalid());
            }
            &rest[..end]
        };

        let mut num = BigInt::parse_bytes(num.as_bytes(), 10).ok_or_else(invalid)?;
        if negative {
            num = -num;
        }
        let den = BigInt::parse_bytes(den.as_bytes(), 10).ok_or_else(invalid)?;
        Fraction::new(num, den)
    }
}

impl From<BigInt> for Fraction {
    fn from(value: BigInt) -> Self {
        Fraction::from_integer(value)
    }
}

impl From<i64> for Fraction {
    fn from(value: i64) -> Self {
        Fraction::from_integer(value)
    }
}

impl From<i32> for Fraction {
    fn from(value: i32) -> Self {
        Fraction::from_integer(value)
    }
}

impl From<&Fraction> for Fraction {
    fn from(value: &Fraction) -> Self {
        value.clone()
    }
}

impl Add<&Fraction> for &Fraction {
    type Output = Fraction;

    fn add(self, rhs: &Fraction) -> Fraction {
        if self.den == rhs.den {
            return Fraction::reduced(&self.num + &rhs.num, self.den.clone());
        }

        Fraction::reduced(
            &self.num * &rhs.den + &rhs.num * &self.den,
            &self.den * &rhs.den,
        )
    }
}

impl Sub<&Fraction> for &Fraction {
    type Output = Fraction;

    fn sub(self, rhs: &Fraction) -> Fraction {
        if self.den == rhs.den {
            return Fraction::reduced(&self.num - &rhs.num, self.den.clone());
        }

        Fraction::reduced(
            &self.num * &rhs.den - &rhs.num * &self.den,
            &self.den * &rhs.den,
        )
    }
}

impl Mul<&Fraction> for &Fraction {
    type Output = Fraction;

    fn mul(self, rhs: &Fraction) -> Fraction {
        Fraction::reduced(&self.num * &rhs.num, &self.den * &rhs.den)
    }
}

/// # Panics
///
/// Panics when dividing by zero, like integer division. Use
/// [`Fraction::checked_div`] to get an error instead.
impl Div<&Fraction> for &Fraction {
    type Output = Fraction;

    fn div(self, rhs: &Fraction) -> Fraction {
        match self.checked_div(rhs) {
            Ok(quotient) => quotient,
            Err(_) => panic!("Division by zero"),
        }
    }
}

// Owned and integer operands all go through the `&Fraction op &Fraction` impls.
macro_rules! forward_binop {
    ($imp:ident, $method:ident, $assign_imp:ident, $assign_method:ident) => {
        impl $imp<Fraction> for Fraction {
            type Output = Fraction;

            fn $method(self, rhs: Fraction) -> Fraction {
                (&self).$method(&rhs)
            }
        }

        impl $imp<&Fraction> for Fraction {
            type Output = Fraction;

            fn $method(self, rhs: &Fraction) -> Fraction {
                (&self).$method(rhs)
            }
        }

        impl $imp<Fraction> for &Fraction {
            type Output = Fraction;

            fn $method(self, rhs: Fraction) -> Fraction {
                self.$method(&rhs)
            }
        }

        impl $imp<i64> for Fraction {
            type Output = Fraction;

            fn $method(self, rhs: i64) -> Fraction {
                (&self).$method(&Fraction::from(rhs))
            }
        }

        impl $imp<i64> for &Fraction {
            type Output = Fraction;

            fn $method(self, rhs: i64) -> Fraction {
                self.$method(&Fraction::from(rhs))
            }
        }

        impl $imp<Fraction> for i64 {
            type Output = Fraction;

            fn $method(self, rhs: Fraction) -> Fraction {
                (&Fraction::from(self)).$method(&rhs)
            }
        }

        impl $imp<&Fraction> for i64 {
            type Output = Fraction;

            fn $method(self, rhs: &Fraction) -> Fraction {
                (&Fraction::from(self)).$method(rhs)
            }
        }

        impl ops::$assign_imp<&Fraction> for Fraction {
            fn $assign_method(&mut self, rhs: &Fraction) {
                *self = (&*self).$method(rhs);
            }
        }

        impl ops::$assign_imp<Fraction> for Fraction {
            fn $assign_method(&mut self, rhs: Fraction) {
                *self = (&*self).$method(&rhs);
            }
        }
    };
}

forward_binop!(Add, add, AddAssign, add_assign);
forward_binop!(Sub, sub, SubAssign, sub_assign);
forward_binop!(Mul, mul, MulAssign, mul_assign);
forward_binop!(Div, div, DivAssign, div_assign);

impl ops::Neg for Fraction {
    type Output = Fraction;

    fn neg(self) -> Fraction {
        Fraction {
            num: -self.num,
            den: self.den,
        }
    }
}

impl ops::Neg for &Fraction {
    type Output = Fraction;

    fn neg(self) -> Fraction {
        Fraction {
            num: -&self.num,
            den: self.den.clone(),
        }
    }
}

impl One for Fraction {
    fn one() -> Fraction {
        Fraction::from_integer(1)
    }
}

impl Zero for Fraction {
    fn zero() -> Fraction {
        Fraction::from_integer(0)
    }

    fn is_zero(&self) -> bool {
        self.num.is_zero()
    }
}

impl Display for Fraction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // pad as a whole so `{:^10}` centers "3/4" rather than its parts
        if self.den.is_one() {
            return f.pad(&self.num.to_string());
        }
        f.pad(&format!("{}/{}", self.num, self.den))
    }
}

impl PartialEq<Fraction> for Fraction {
    fn eq(&self, rhs: &Fraction) -> bool {
        &self.num * &rhs.den == &rhs.num * &self.den
    }
}

impl PartialEq<i64> for Fraction {
    fn eq(&self, rhs: &i64) -> bool {
        self.num == &self.den * *rhs
    }
}

impl PartialOrd<Fraction> for Fraction {
    fn partial_cmp(&self, rhs: &Fraction) -> Option<Ordering> {
        Some(self.cmp(rhs))
    }
}

impl PartialOrd<i64> for Fraction {
    fn partial_cmp(&self, rhs: &i64) -> Option<Ordering> {
        Some(self.num.cmp(&(&self.den * *rhs)))
    }
}

impl Eq for Fraction {}
impl Ord for Fraction {
    fn cmp(&self, rhs: &Fraction) -> Ordering {
        // denominators are positive, cross multiplication keeps the order
        let a = &self.num * &rhs.den;
        let b = &rhs.num * &self.den;
        a.cmp(&b)
    }
}

impl std::iter::Sum<Fraction> for Fraction {
    fn sum<I: Iterator<Item = Fraction>>(iter: I) -> Fraction {
        iter.fold(Fraction::zero(), |acc, f| acc + f)
    }
}

impl<'a> std::iter::Sum<&'a Fraction> for Fraction {
    fn sum<I: Iterator<Item = &'a Fraction>>(iter: I) -> Fraction {
        iter.fold(Fraction::zero(), |acc, f| acc + f)
    }
}

impl std::iter::Product<Fraction> for Fraction {
    fn product<I: Iterator<Item = Fraction>>(iter: I) -> Fraction {
        iter.fold(Fraction::one(), |acc, f| acc * f)
    }
}

impl<'a> std::iter::Product<&'a Fraction> for Fraction {
    fn product<I: Iterator<Item = &'a Fraction>>(iter: I) -> Fraction {
        iter.fold(Fraction::one(), |acc, f| acc * f)
    }
}

// --------------------------------------------------
//                      TESTS
// --------------------------------------------------
