use crate::rule::{InvalidRule, PeriodDirection, PeriodUnit, SelectionRule};

/// Largest digit count a period amount may carry (1..=999999).
const MAX_AMOUNT_DIGITS: usize = 6;

/// Parse a compact period expression into a `RelativePeriod` rule.
///
/// Grammar: optional leading `-`, then 1-6 ASCII digits, then exactly one
/// unit letter from {s, m, h, d} (case-insensitive). A leading `-` keeps
/// files within the last period (timestamp > now - amount); without it the
/// rule keeps files older than the period (timestamp < now - amount).
///
/// Examples: `-2h` (written in the last two hours), `30d` (untouched for
/// thirty days).
pub fn parse_period(input: &str) -> Result<SelectionRule, InvalidRule> {
    let s = input.trim();

    let (direction, rest) = match s.strip_prefix('-') {
        Some(r) => (PeriodDirection::WithinLast, r),
        None => (PeriodDirection::OlderThan, s),
    };

    // Digits and the unit letter are all single-byte, so byte splitting is
    // safe once we know the input is ASCII.
    if !rest.is_ascii() || rest.len() < 2 {
        return Err(InvalidRule::MalformedPeriod(input.to_owned()));
    }

    let (num_str, unit_str) = rest.split_at(rest.len() - 1);

    if num_str.len() > MAX_AMOUNT_DIGITS || !num_str.bytes().all(|b| b.is_ascii_digit()) {
        return Err(InvalidRule::MalformedPeriod(input.to_owned()));
    }

    let amount: u64 = num_str
        .parse()
        .map_err(|_| InvalidRule::MalformedPeriod(input.to_owned()))?;
    if amount == 0 {
        return Err(InvalidRule::NonPositiveAmount);
    }

    let unit_char = unit_str
        .chars()
        .next()
        .ok_or_else(|| InvalidRule::MalformedPeriod(input.to_owned()))?;
    let unit = PeriodUnit::from_letter(unit_char).ok_or(InvalidRule::UnknownUnit(unit_char))?;

    Ok(SelectionRule::RelativePeriod {
        amount,
        unit,
        direction,
    })
}

#[cfg(test)]
#[path = "period_tests.rs"]
mod tests;
