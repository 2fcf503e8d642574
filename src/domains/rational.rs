use std::{
    cmp::Ordering,
    fmt::{Display, Formatter},
    iter::Sum,
    ops::{Add, AddAssign, Div, Mul, MulAssign, Neg, Sub},
    str::FromStr,
};

use rug::Integer;
use thiserror::Error;

/// An exact fraction of two arbitrary-precision integers.
///
/// Every constructor divides out the gcd of the numerator and denominator and
/// moves the sign to the numerator, so two rationals with the same value also have
/// the same representation. A zero denominator is representable: `0/0`
/// and `±1/0` come out of construction unchanged and propagate through arithmetic.
#[derive(Clone, PartialEq, Eq, Hash, Debug)]
pub struct Rational {
    numerator: Integer,
    denominator: Integer,
}

/// A token that is not of the form `<int>` or `<int>/<int>`.
#[derive(Clone, PartialEq, Eq, Debug, Error)]
#[error("Invalid rational format: '{text}'")]
pub struct ParseRationalError {
    pub text: String,
}

impl Rational {
    /// Create the reduced fraction `numerator/denominator` with a non-negative denominator.
    pub fn new<N: Into<Integer>, D: Into<Integer>>(numerator: N, denominator: D) -> Rational {
        let mut numerator = numerator.into();
        let mut denominator = denominator.into();

        let g = Integer::from(numerator.gcd_ref(&denominator));
        // only zero for 0/0
        if g != 0 && g != 1 {
            numerator.div_exact_mut(&g);
            denominator.div_exact_mut(&g);
        }

        if denominator < 0 {
            numerator = -numerator;
            denominator = -denominator;
        }

        Rational {
            numerator,
            denominator,
        }
    }

    pub fn zero() -> Rational {
        Rational {
            numerator: 0.into(),
            denominator: 1.into(),
        }
    }

    pub fn one() -> Rational {
        Rational {
            numerator: 1.into(),
            denominator: 1.into(),
        }
    }

    pub fn numerator(&self) -> &Integer {
        &self.numerator
    }

    pub fn denominator(&self) -> &Integer {
        &self.denominator
    }

    /// Exact zero test. The degenerate `0/0` is not zero, matching `self == 0`.
    pub fn is_zero(&self) -> bool {
        self.numerator == 0 && self.denominator != 0
    }

    pub fn is_one(&self) -> bool {
        self.numerator == 1 && self.denominator == 1
    }

    pub fn is_integer(&self) -> bool {
        self.denominator == 1
    }

    /// Divide the numerator by the denominator in floating point.
    ///
    /// A zero denominator gives `NaN` for `0/0` and `±inf` otherwise.
    pub fn to_f64(&self) -> f64 {
        if self.denominator == 0 {
            return self.numerator.to_f64() / 0.0;
        }

        rug::Rational::from((self.numerator.clone(), self.denominator.clone())).to_f64()
    }
}

impl From<i64> for Rational {
    fn from(value: i64) -> Self {
        Rational {
            numerator: value.into(),
            denominator: 1.into(),
        }
    }
}

impl From<Integer> for Rational {
    fn from(value: Integer) -> Self {
        Rational {
            numerator: value,
            denominator: 1.into(),
        }
    }
}

impl From<(i64, i64)> for Rational {
    fn from((num, den): (i64, i64)) -> Self {
        Rational::new(num, den)
    }
}

impl FromStr for Rational {
    type Err = ParseRationalError;

    /// Parse `<int>` or `<int>/<int>`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = || ParseRationalError {
            text: s.to_string(),
        };

        let mut parts = s.split('/');
        let num = parts.next().ok_or_else(err)?;
        let den = parts.next();
        if parts.next().is_some() {
            return Err(err());
        }

        let num: Integer = num.parse().map_err(|_| err())?;
        match den {
            Some(den) => {
                let den: Integer = den.parse().map_err(|_| err())?;
                Ok(Rational::new(num, den))
            }
            None => Ok(Rational::new(num, 1)),
        }
    }
}

impl Display for Rational {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        if self.denominator == 1 {
            write!(f, "{}", self.numerator)
        } else {
            write!(f, "{}/{}", self.numerator, self.denominator)
        }
    }
}

// Ordering goes through `f64`, so two distinct but close rationals may be
// neither greater nor equal, and are then unordered. `<` and `<=` are defined
// as the negations of `>=` and `>`, not through `partial_cmp`.
impl PartialOrd for Rational {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        if self == other {
            Some(Ordering::Equal)
        } else if self.gt(other) {
            Some(Ordering::Greater)
        } else if other.gt(self) {
            Some(Ordering::Less)
        } else {
            None
        }
    }

    fn gt(&self, other: &Self) -> bool {
        self.to_f64() > other.to_f64()
    }

    fn ge(&self, other: &Self) -> bool {
        self == other || self.gt(other)
    }

    fn lt(&self, other: &Self) -> bool {
        !self.ge(other)
    }

    fn le(&self, other: &Self) -> bool {
        !self.gt(other)
    }
}

impl PartialEq<i64> for Rational {
    fn eq(&self, other: &i64) -> bool {
        self.to_f64() == *other as f64
    }
}

impl PartialOrd<i64> for Rational {
    fn partial_cmp(&self, other: &i64) -> Option<Ordering> {
        if self == other {
            Some(Ordering::Equal)
        } else if self.gt(other) {
            Some(Ordering::Greater)
        } else if (*other as f64) > self.to_f64() {
            Some(Ordering::Less)
        } else {
            None
        }
    }

    fn gt(&self, other: &i64) -> bool {
        self.to_f64() > *other as f64
    }

    fn ge(&self, other: &i64) -> bool {
        self == other || self.gt(other)
    }

    fn lt(&self, other: &i64) -> bool {
        !self.ge(other)
    }

    fn le(&self, other: &i64) -> bool {
        !self.gt(other)
    }
}

impl<'a, 'b> Add<&'a Rational> for &'b Rational {
    type Output = Rational;

    fn add(self, other: &'a Rational) -> Self::Output {
        if self.denominator == other.denominator {
            return Rational::new(
                Integer::from(&self.numerator + &other.numerator),
                self.denominator.clone(),
            );
        }

        Rational::new(
            Integer::from(&self.numerator * &other.denominator)
                + Integer::from(&other.numerator * &self.denominator),
            Integer::from(&self.denominator * &other.denominator),
        )
    }
}

impl<'a> Add<i64> for &'a Rational {
    type Output = Rational;

    fn add(self, other: i64) -> Self::Output {
        Rational::new(
            Integer::from(&self.denominator * other) + &self.numerator,
            self.denominator.clone(),
        )
    }
}

impl<'a, 'b> Sub<&'a Rational> for &'b Rational {
    type Output = Rational;

    fn sub(self, other: &'a Rational) -> Self::Output {
        self + &(-other)
    }
}

impl<'a> Sub<i64> for &'a Rational {
    type Output = Rational;

    fn sub(self, other: i64) -> Self::Output {
        Rational::new(
            &self.numerator - Integer::from(&self.denominator * other),
            self.denominator.clone(),
        )
    }
}

impl<'a, 'b> Mul<&'a Rational> for &'b Rational {
    type Output = Rational;

    fn mul(self, other: &'a Rational) -> Self::Output {
        Rational::new(
            Integer::from(&self.numerator * &other.numerator),
            Integer::from(&self.denominator * &other.denominator),
        )
    }
}

impl<'a> Mul<i64> for &'a Rational {
    type Output = Rational;

    fn mul(self, other: i64) -> Self::Output {
        Rational::new(
            Integer::from(&self.numerator * other),
            self.denominator.clone(),
        )
    }
}

impl<'a, 'b> Div<&'a Rational> for &'b Rational {
    type Output = Rational;

    fn div(self, other: &'a Rational) -> Self::Output {
        Rational::new(
            Integer::from(&self.numerator * &other.denominator),
            Integer::from(&self.denominator * &other.numerator),
        )
    }
}

impl<'a> Div<i64> for &'a Rational {
    type Output = Rational;

    fn div(self, other: i64) -> Self::Output {
        Rational::new(
            self.numerator.clone(),
            Integer::from(&self.denominator * other),
        )
    }
}

impl<'a> Neg for &'a Rational {
    type Output = Rational;

    fn neg(self) -> Self::Output {
        self * -1i64
    }
}

impl Neg for Rational {
    type Output = Rational;

    fn neg(self) -> Self::Output {
        &self * -1i64
    }
}

/// Implement the owned variants of a binary operator in terms of the borrowed one.
macro_rules! forward_binop {
    ($imp:ident, $method:ident) => {
        impl $imp<Rational> for Rational {
            type Output = Rational;

            fn $method(self, other: Rational) -> Self::Output {
                (&self).$method(&other)
            }
        }

        impl<'a> $imp<&'a Rational> for Rational {
            type Output = Rational;

            fn $method(self, other: &'a Rational) -> Self::Output {
                (&self).$method(other)
            }
        }

        impl<'a> $imp<Rational> for &'a Rational {
            type Output = Rational;

            fn $method(self, other: Rational) -> Self::Output {
                self.$method(&other)
            }
        }

        impl $imp<i64> for Rational {
            type Output = Rational;

            fn $method(self, other: i64) -> Self::Output {
                (&self).$method(other)
            }
        }
    };
}

forward_binop!(Add, add);
forward_binop!(Sub, sub);
forward_binop!(Mul, mul);
forward_binop!(Div, div);

impl<'a> Add<&'a Rational> for i64 {
    type Output = Rational;

    fn add(self, other: &'a Rational) -> Self::Output {
        other + self
    }
}

impl<'a> Mul<&'a Rational> for i64 {
    type Output = Rational;

    fn mul(self, other: &'a Rational) -> Self::Output {
        other * self
    }
}

impl<'a> Div<&'a Rational> for i64 {
    type Output = Rational;

    /// Compute `self / other`, i.e. `(self * d) / n`.
    fn div(self, other: &'a Rational) -> Self::Output {
        Rational::new(
            Integer::from(&other.denominator * self),
            other.numerator.clone(),
        )
    }
}

impl Div<Rational> for i64 {
    type Output = Rational;

    fn div(self, other: Rational) -> Self::Output {
        self / &other
    }
}

impl<'a> AddAssign<&'a Rational> for Rational {
    fn add_assign(&mut self, other: &'a Rational) {
        *self = &*self + other;
    }
}

impl<'a> MulAssign<&'a Rational> for Rational {
    fn mul_assign(&mut self, other: &'a Rational) {
        *self = &*self * other;
    }
}

impl Sum for Rational {
    fn sum<I: Iterator<Item = Rational>>(iter: I) -> Self {
        iter.fold(Rational::zero(), |mut acc, x| {
            acc += &x;
            acc
        })
    }
}
