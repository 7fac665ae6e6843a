//! Channel-list strings.
//!
//! The driver names several channels or terminals in one string:
//! comma-separated entries, each either a single name or a range whose ends
//! share a prefix and differ in a trailing number (`Dev1/ai0:3`).

/// Expands ranges and splits on commas.
///
/// ```
/// use daqmx::utils::unflatten_channel_string;
///
/// assert_eq!(
///     unflatten_channel_string("Dev1/ai0:2, Dev1/ai5"),
///     ["Dev1/ai0", "Dev1/ai1", "Dev1/ai2", "Dev1/ai5"]
/// );
/// ```
#[must_use]
pub fn unflatten_channel_string(channels: &str) -> Vec<String> {
    let mut names = Vec::new();
    for entry in channels.split(',').map(str::trim).filter(|e| !e.is_empty()) {
        match expand_range(entry) {
            Some(expanded) => names.extend(expanded),
            None => names.push(entry.to_string()),
        }
    }
    names
}

/// Joins names with `", "`, collapsing consecutive numbers into ranges.
///
/// ```
/// use daqmx::utils::flatten_channel_string;
///
/// let names = ["Dev1/ai0", "Dev1/ai1", "Dev1/ai2", "Dev1/ai5"];
/// assert_eq!(flatten_channel_string(&names), "Dev1/ai0:2, Dev1/ai5");
/// ```
#[must_use]
pub fn flatten_channel_string<S: AsRef<str>>(channels: &[S]) -> String {
    let mut runs: Vec<Run<'_>> = Vec::new();
    for name in channels
        .iter()
        .map(|c| c.as_ref().trim())
        .filter(|n| !n.is_empty())
    {
        if let Some(run) = runs.last_mut() {
            if run.extend(name) {
                continue;
            }
        }
        runs.push(Run::new(name));
    }
    runs.iter().map(Run::render).collect::<Vec<_>>().join(", ")
}

/// `("Dev1/ai", "12")` for `"Dev1/ai12"`.
fn split_number(name: &str) -> Option<(&str, &str)> {
    let prefix = name.trim_end_matches(|c: char| c.is_ascii_digit());
    if prefix.len() == name.len() {
        return None;
    }
    Some((prefix, &name[prefix.len()..]))
}

fn is_padded(digits: &str) -> bool {
    digits.len() > 1 && digits.starts_with('0')
}

fn expand_range(entry: &str) -> Option<Vec<String>> {
    let (left, right) = entry.split_once(':')?;
    let (prefix, first) = split_number(left.trim())?;
    let (right_prefix, last) = split_number(right.trim())?;
    if !right_prefix.is_empty() && right_prefix != prefix {
        return None;
    }
    let start: u64 = first.parse().ok()?;
    let end: u64 = last.parse().ok()?;
    let width = if is_padded(first) { first.len() } else { 0 };

    let name = |n: u64| format!("{prefix}{n:0width$}");
    Some(if start <= end {
        (start..=end).map(name).collect()
    } else {
        (end..=start).rev().map(name).collect()
    })
}

/// A maximal sequence of names counting up or down by one.
struct Run<'a> {
    first: &'a str,
    number: Option<(&'a str, &'a str)>,
    last_value: u64,
    last_digits: Option<&'a str>,
    step: i8,
}

impl<'a> Run<'a> {
    fn new(name: &'a str) -> Self {
        let number = split_number(name);
        let last_value = number.and_then(|(_, d)| d.parse().ok()).unwrap_or_default();
        Self {
            first: name,
            number,
            last_value,
            last_digits: None,
            step: 0,
        }
    }

    fn extend(&mut self, name: &'a str) -> bool {
        let Some((prefix, first_digits)) = self.number else {
            return false;
        };
        let Some((next_prefix, digits)) = split_number(name) else {
            return false;
        };
        if next_prefix != prefix {
            return false;
        }
        let padded = is_padded(first_digits);
        if (padded && digits.len() != first_digits.len()) || (!padded && is_padded(digits)) {
            return false;
        }
        let Ok(value) = digits.parse::<u64>() else {
            return false;
        };
        let step = if self.last_value.checked_add(1) == Some(value) {
            1
        } else if value.checked_add(1) == Some(self.last_value) {
            -1
        } else {
            return false;
        };
        if self.step != 0 && self.step != step {
            return false;
        }
        self.step = step;
        self.last_value = value;
        self.last_digits = Some(digits);
        true
    }

    fn render(&self) -> String {
        match self.last_digits {
            Some(last) => format!("{}:{last}", self.first),
            None => self.first.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unflatten_handles_lists_ranges_and_whitespace() {
        assert_eq!(
            unflatten_channel_string(" Dev1/ai0 ,Dev1/ai2:4,, myChan "),
            ["Dev1/ai0", "Dev1/ai2", "Dev1/ai3", "Dev1/ai4", "myChan"]
        );
        assert!(unflatten_channel_string("").is_empty());
    }

    #[test]
    fn unflatten_descending_and_full_name_ranges() {
        assert_eq!(
            unflatten_channel_string("Dev1/port0/line3:Dev1/port0/line1"),
            ["Dev1/port0/line3", "Dev1/port0/line2", "Dev1/port0/line1"]
        );
    }

    #[test]
    fn unflatten_keeps_zero_padding() {
        assert_eq!(unflatten_channel_string("ch08:10"), ["ch08", "ch09", "ch10"]);
    }

    #[test]
    fn entries_without_numbers_are_literal() {
        assert_eq!(unflatten_channel_string("a:b"), ["a:b"]);
        assert_eq!(unflatten_channel_string("Dev1/ai0:Dev2/ai3"), ["Dev1/ai0:Dev2/ai3"]);
    }

    #[test]
    fn flatten_collapses_runs_in_either_direction() {
        let names = ["Dev1/ai3", "Dev1/ai2", "Dev1/ai1", "Dev1/ai7", "Dev1/ai8", "temp"];
        assert_eq!(flatten_channel_string(&names), "Dev1/ai3:1, Dev1/ai7:8, temp");
    }

    #[test]
    fn flatten_does_not_mix_prefixes_or_padding() {
        let names = ["Dev1/ai0", "Dev2/ai1", "ch09", "ch10", "x1", "x02"];
        assert_eq!(
            flatten_channel_string(&names),
            "Dev1/ai0, Dev2/ai1, ch09:10, x1, x02"
        );
    }

    #[test]
    fn flatten_then_unflatten_restores_names() {
        let names: Vec<String> = (0..6).map(|i| format!("Dev1/ctr{i}")).collect();
        let flat = flatten_channel_string(&names);
        assert_eq!(flat, "Dev1/ctr0:5");
        assert_eq!(unflatten_channel_string(&flat), names);
    }
}
