use std::ops::Index;

use chrono::NaiveDate;
use lazy_static::lazy_static;
use regex::Regex;
use unidecode::unidecode;

pub const WORDS_PER_MINUTE: u32 = 200;

fn to_int<T: std::str::FromStr>(num_str: &str, date_str: &str) -> Result<T, String> {
    match num_str.parse::<T>() {
        Ok(x) => Ok(x),
        Err(_) => Err(format!("Error parsing {} from the date {}", num_str, date_str)),
    }
}

/// Parses a calendar date written as `YYYY-MM-DD`.
///
/// Anything after the day (a time of day, a timezone) is rejected so that a
/// date is never silently shifted through an instant.
pub fn parse_date(buf: &str) -> Result<NaiveDate, String> {
    lazy_static! {
        static ref DATE_REGEX: Regex = Regex::new(r"^(\d{4})-(\d{1,2})-(\d{1,2})$").unwrap();
    }

    let buf = buf.trim().trim_matches(|c| c == '"' || c == '\'');
    let Some(caps) = DATE_REGEX.captures(buf) else {
        return Err(format!("Unable to parse date {}", buf));
    };

    let y: i32 = to_int(caps.index(1), buf)?;
    let m: u32 = to_int(caps.index(2), buf)?;
    let d: u32 = to_int(caps.index(3), buf)?;

    NaiveDate::from_ymd_opt(y, m, d).ok_or_else(|| format!("Date out of range {}", buf))
}

/// Renders a date as `Feb 10, 2026`. chrono month names are fixed English,
/// independent of the process locale and timezone.
pub fn format_naive_date(date: &NaiveDate) -> String {
    date.format("%b %-d, %Y").to_string()
}

pub fn format_date(buf: &str) -> Result<String, String> {
    let date = parse_date(buf)?;
    Ok(format_naive_date(&date))
}

pub fn word_count(text: &str) -> usize {
    text.split_whitespace().count()
}

pub fn reading_time_minutes(word_count: usize, words_per_minute: u32) -> u32 {
    let wpm = words_per_minute.max(1) as usize;
    word_count.div_ceil(wpm) as u32
}

/// URL slug from a title: ASCII transliteration, lowercase, words joined by
/// single dashes.
pub fn slugify(title: &str) -> String {
    let ascii = unidecode(title).to_ascii_lowercase();

    let mut slug = String::with_capacity(ascii.len());
    for c in ascii.chars() {
        if c.is_ascii_alphanumeric() {
            slug.push(c);
        } else if !slug.is_empty() && !slug.ends_with('-') {
            slug.push('-');
        }
    }

    slug.trim_end_matches('-').to_string()
}
