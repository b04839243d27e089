// Sitepost - A content publishing API for Hugo sites
// Copyright (C) 2025 Sitepost Project Contributors
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU Affero General Public License as
// published by the Free Software Foundation, either version 3 of the
// License, or (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU Affero General Public License for more details.
//
// You should have received a copy of the GNU Affero General Public License
// along with this program.  If not, see <https://www.gnu.org/licenses/>.

use deunicode::deunicode;
use once_cell::sync::Lazy;
use regex::Regex;

static SLUG_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[^a-z0-9]+").expect("Failed to compile slug regex"));

/// Longest slug produced from a title
const MAX_SLUG_LEN: usize = 100;

/// Generate a URL-friendly slug from a title
///
/// Accented and non-Latin characters are transliterated to ASCII first, so
/// `"Café René"` becomes `"cafe-rene"` rather than losing letters.
pub fn generate_slug_from_title(title: &str) -> String {
    // Transliterate, then lowercase and trim
    let mut slug = deunicode(title.trim()).to_lowercase();

    // Replace runs of non-alphanumeric characters with a single hyphen
    slug = SLUG_REGEX.replace_all(&slug, "-").to_string();

    slug = slug.trim_matches('-').to_string();

    if slug.is_empty() {
        slug = "untitled".to_string();
    }

    if slug.len() > MAX_SLUG_LEN {
        slug = slug
            .chars()
            .take(MAX_SLUG_LEN)
            .collect::<String>()
            .trim_end_matches('-')
            .to_string();
    }

    slug
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_slug_basic() {
        assert_eq!(generate_slug_from_title("Hello World"), "hello-world");
        assert_eq!(generate_slug_from_title("About Us"), "about-us");
        assert_eq!(generate_slug_from_title("Contact"), "contact");
    }

    #[test]
    fn test_generate_slug_special_characters() {
        assert_eq!(generate_slug_from_title("Hello, World!"), "hello-world");
        assert_eq!(generate_slug_from_title("What's New?"), "what-s-new");
        assert_eq!(generate_slug_from_title("Price: $99.99"), "price-99-99");
        assert_eq!(
            generate_slug_from_title("Email@example.com"),
            "email-example-com"
        );
    }

    #[test]
    fn test_generate_slug_whitespace() {
        assert_eq!(generate_slug_from_title("  Hello  World  "), "hello-world");
        assert_eq!(
            generate_slug_from_title("\tTabs\tand\tSpaces\t"),
            "tabs-and-spaces"
        );
    }

    #[test]
    fn test_generate_slug_edge_cases() {
        assert_eq!(generate_slug_from_title(""), "untitled");
        assert_eq!(generate_slug_from_title("   "), "untitled");
        assert_eq!(generate_slug_from_title("!!!"), "untitled");
        assert_eq!(generate_slug_from_title("---"), "untitled");
    }

    #[test]
    fn test_generate_slug_transliterates_accents() {
        assert_eq!(generate_slug_from_title("Café René"), "cafe-rene");
        assert_eq!(generate_slug_from_title("Über uns"), "uber-uns");
        assert_eq!(generate_slug_from_title("Ação Rápida"), "acao-rapida");
    }

    #[test]
    fn test_generate_slug_long_title() {
        let long_title = "This is a very long title that exceeds one hundred characters and should be truncated to ensure reasonable URL length for better usability";
        let slug = generate_slug_from_title(long_title);
        assert!(slug.len() <= MAX_SLUG_LEN);
        assert!(!slug.ends_with('-'));
    }

    #[test]
    fn test_generate_slug_consecutive_special_chars() {
        assert_eq!(generate_slug_from_title("Hello---World"), "hello-world");
        assert_eq!(generate_slug_from_title("Test___Case"), "test-case");
    }
}
