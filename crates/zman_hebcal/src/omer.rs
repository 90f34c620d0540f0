//! Omer-day rendering.

fn ordinal(n: u8) -> String {
    let suffix = match (n % 10, n % 100) {
        (_, 11..=13) => "th",
        (1, _) => "st",
        (2, _) => "nd",
        (3, _) => "rd",
        _ => "th",
    };
    format!("{n}{suffix}")
}

/// "15th day of the Omer". `None` outside 1..=49.
pub fn omer_text(day: u8) -> Option<String> {
    (1..=49).contains(&day).then(|| format!("{} day of the Omer", ordinal(day)))
}
