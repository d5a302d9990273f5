//! Rational approximation of square roots.
//!
//! [`ratio_sqrt`] finds a [`Rational`] within `1 / eps` of `sqrt(r)` using only exact integer
//! arithmetic, so the result is reproducible on every platform. Perfect squares are returned
//! exactly. Everything else is expanded as a continued fraction
//!
//! ```text
//! f(x) = C1 + 1/(C2 + 1/(C3 + ... + 1/(Cn + x))) = (U*x + V) / (W*x + 1)
//! ```
//!
//! with `sqrt(r) = f(rem)`. The error of the estimate `V` is
//! `|f(rem) - V| = |(U - W*V) x / (W*x + 1)| <= |U - W*V| / I'`, where `I'` is the integer part
//! of the reciprocal of the next remainder. Terms are added until that bound drops below the
//! tolerance.
//!
//! Larger `eps` gives tighter results but bigger intermediate integers, so a very large `eps`
//! can fail with [`UnitsError::Overflow`].

use crate::errors::{UnitsError, UnitsResult};
use crate::rational::Rational;
use log::trace;
use num::integer::Roots;

/// Default inverse tolerance, bounding the error of a square root by `1e-10`.
pub const DEFAULT_SQRT_EPSILON: i128 = 10_000_000_000;

/// `sqrt(p) - q`
#[derive(Debug, Clone, Copy)]
struct Remainder {
    p: Rational,
    q: Rational,
}

/// `1 / rem = integer + next`, where `integer` is the integer part of the reciprocal.
#[derive(Debug, Clone, Copy)]
struct Reciprocal {
    integer: Rational,
    next: Remainder,
}

/// `floor(sqrt(r))` for `r >= 0`.
fn integer_sqrt(r: &Rational) -> i128 {
    r.floor().sqrt()
}

fn reciprocal(rem: &Remainder) -> UnitsResult<Reciprocal> {
    // 1 / (sqrt(p) - q) = (sqrt(p) + q) / (p - q^2) = sqrt(b) + a
    let den = rem.p.checked_sub(&rem.q.checked_mul(&rem.q)?)?;
    let a = rem.q.checked_div(&den)?;
    let b = rem.p.checked_div(&den.checked_mul(&den)?)?;

    // floor(a + sqrt(b)) computed in integers as floor((a.n + floor(sqrt(b * a.d^2))) / a.d)
    let a_denom = Rational::new(a.denom(), 1)?;
    let scaled = b.checked_mul(&a_denom.checked_mul(&a_denom)?)?;
    let integer = a
        .numer()
        .checked_add(integer_sqrt(&scaled))
        .ok_or_else(|| UnitsError::Overflow("square root".to_string()))?
        .div_euclid(a.denom());
    let integer = Rational::new(integer, 1)?;

    Ok(Reciprocal {
        integer,
        next: Remainder {
            p: b,
            q: integer.checked_sub(&a)?,
        },
    })
}

/// Returns the exact square root of `r` if both its numerator and denominator are perfect
/// squares.
fn exact_sqrt(r: &Rational) -> Option<Rational> {
    let numer = r.numer().sqrt();
    let denom = r.denom().sqrt();
    if numer * numer == r.numer() && denom * denom == r.denom() {
        Rational::new(numer, denom).ok()
    } else {
        None
    }
}

/// Approximates `sqrt(r)` by a rational `q` with `|sqrt(r) - q| <= 1 / eps`.
///
/// # Errors
///
/// - [`UnitsError::InvalidDomain`] if `r` is negative or `eps` is not positive.
/// - [`UnitsError::Overflow`] if the expansion needs integers wider than 128 bits.
///
/// # Example
///
/// ```
/// use rsunits_core::rational::Rational;
/// use rsunits_core::ratio_sqrt::ratio_sqrt;
///
/// let four_ninths = Rational::new(4, 9).unwrap();
/// assert_eq!(ratio_sqrt(&four_ninths, 1000).unwrap(), Rational::new(2, 3).unwrap());
///
/// let root_two = ratio_sqrt(&Rational::from_integer(2), 1_000_000).unwrap();
/// assert!((root_two.to_f64() - 2f64.sqrt()).abs() <= 1e-6);
/// ```
pub fn ratio_sqrt(r: &Rational, eps: i128) -> UnitsResult<Rational> {
    if r.is_negative() {
        return Err(UnitsError::InvalidDomain(format!(
            "cannot take the square root of negative ratio {r}"
        )));
    }
    if eps <= 0 {
        return Err(UnitsError::InvalidDomain(format!(
            "square root tolerance 1/{eps} must be positive"
        )));
    }
    if let Some(root) = exact_sqrt(r) {
        return Ok(root);
    }

    let tolerance = Rational::new(1, eps)?;

    // First term: f(x) = floor(sqrt(r)) + x
    let mut u = Rational::ONE;
    let mut v = Rational::new(integer_sqrt(r), 1)?;
    let mut w = Rational::ZERO;
    let mut step = reciprocal(&Remainder { p: *r, q: v })?;
    let mut error = step.integer.reciprocal()?;
    let mut terms = 1;

    while error > tolerance {
        let den = w.checked_add(&step.integer)?;
        let next_u = v.checked_div(&den)?;
        let next_v = u
            .checked_add(&v.checked_mul(&step.integer)?)?
            .checked_div(&den)?;
        let next_w = den.reciprocal()?;
        (u, v, w) = (next_u, next_v, next_w);

        step = reciprocal(&step.next)?;
        error = u
            .checked_sub(&v.checked_mul(&w)?)?
            .checked_div(&step.integer)?
            .abs();
        terms += 1;
        trace!("sqrt({r}): term {terms} estimate {v} error bound {error}");
    }
    Ok(v)
}
