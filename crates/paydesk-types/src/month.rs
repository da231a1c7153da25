use chrono::NaiveDate;

/// Card expiry months travel over the wire as `"MM.YYYY"` and are stored
/// normalized to the first day of that month. `parse_month` and
/// `render_month` are exact inverses for every valid input.
pub fn parse_month(raw: &str) -> Option<NaiveDate> {
    let (month, year) = raw.split_once('.')?;
    if month.len() != 2 || year.len() != 4 {
        return None;
    }
    if !month.bytes().all(|b| b.is_ascii_digit()) || !year.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    let month: u32 = month.parse().ok()?;
    let year: i32 = year.parse().ok()?;
    NaiveDate::from_ymd_opt(year, month, 1)
}

pub fn render_month(date: NaiveDate) -> String {
    date.format("%m.%Y").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_render_roundtrip() {
        for raw in ["01.2024", "09.2027", "12.1999", "02.2100"] {
            let date = parse_month(raw).unwrap();
            assert_eq!(render_month(date), raw);
        }
    }

    #[test]
    fn normalizes_to_first_of_month() {
        let date = parse_month("09.2027").unwrap();
        assert_eq!(date, NaiveDate::from_ymd_opt(2027, 9, 1).unwrap());
    }

    #[test]
    fn rejects_malformed_input() {
        for raw in [
            "",
            "9.2027",
            "09.27",
            "092027",
            "09-2027",
            "13.2027",
            "00.2027",
            "09.2027x",
            "x9.2027",
            "09.20.27",
            "09.",
            ".2027",
        ] {
            assert!(parse_month(raw).is_none(), "accepted {raw:?}");
        }
    }
}
