//! Field validation rules.
//!
//! Pure functions; each failing rule is recorded in a [`ValidationErrors`] so
//! that every problem with an input is reported at once.

use std::sync::LazyLock;

use regex::Regex;

use crate::{
  Result,
  customer::{CustomerUpdate, NewCustomer},
  error::ValidationErrors,
};

pub const FULL_NAME_MIN_LENGTH: usize = 2;
pub const FULL_NAME_MAX_LENGTH: usize = 50;
pub const EMAIL_MIN_LENGTH: usize = 2;
pub const EMAIL_MAX_LENGTH: usize = 100;

pub const FULL_NAME_BLANK_MESSAGE: &str = "Full name must not be blank";
pub const FULL_NAME_LENGTH_MESSAGE: &str =
  "Full name must be between 2 and 50 characters long";
pub const EMAIL_BLANK_MESSAGE: &str = "Email must not be blank";
pub const EMAIL_LENGTH_MESSAGE: &str =
  "Email must be between 2 and 100 characters long";
pub const EMAIL_FORMAT_MESSAGE: &str =
  "Email should be valid and contain exactly one '@'";
pub const PHONE_FORMAT_MESSAGE: &str =
  "Phone number must start with '+' and be between 6 and 14 digits long";

// ASCII digits only; `\d` would accept any Unicode decimal digit.
static PHONE_RE: LazyLock<Regex> =
  LazyLock::new(|| Regex::new(r"^\+[0-9]{6,14}$").expect("Invalid regex"));

// One `@`, no whitespace, and no empty labels in the domain.
static EMAIL_RE: LazyLock<Regex> = LazyLock::new(|| {
  Regex::new(r"^[^@\s]+@[^@\s.]+(\.[^@\s.]+)*$").expect("Invalid regex")
});

fn is_blank(s: &str) -> bool { s.trim().is_empty() }

fn char_len_within(s: &str, min: usize, max: usize) -> bool {
  (min..=max).contains(&s.chars().count())
}

pub fn full_name(value: &str, errs: &mut ValidationErrors) {
  if is_blank(value) {
    errs.push("fullName", FULL_NAME_BLANK_MESSAGE);
  } else if !char_len_within(value, FULL_NAME_MIN_LENGTH, FULL_NAME_MAX_LENGTH) {
    errs.push("fullName", FULL_NAME_LENGTH_MESSAGE);
  }
}

pub fn email(value: &str, errs: &mut ValidationErrors) {
  if is_blank(value) {
    errs.push("email", EMAIL_BLANK_MESSAGE);
    return;
  }
  if !char_len_within(value, EMAIL_MIN_LENGTH, EMAIL_MAX_LENGTH) {
    errs.push("email", EMAIL_LENGTH_MESSAGE);
  }
  if !EMAIL_RE.is_match(value) {
    errs.push("email", EMAIL_FORMAT_MESSAGE);
  }
}

pub fn phone(value: Option<&str>, errs: &mut ValidationErrors) {
  if let Some(p) = value
    && !PHONE_RE.is_match(p)
  {
    errs.push("phone", PHONE_FORMAT_MESSAGE);
  }
}

/// Check every field of a create input.
pub fn new_customer(input: &NewCustomer) -> Result<()> {
  let mut errs = ValidationErrors::default();
  full_name(&input.full_name, &mut errs);
  email(&input.email, &mut errs);
  phone(input.phone.as_deref(), &mut errs);
  errs.into_result()
}

/// Check every field of an update input.
pub fn customer_update(input: &CustomerUpdate) -> Result<()> {
  let mut errs = ValidationErrors::default();
  full_name(&input.full_name, &mut errs);
  phone(input.phone.as_deref(), &mut errs);
  errs.into_result()
}
