// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::{Result, bail};
use serde::{Deserialize, Serialize};

pub const DEFAULT_PAGE_SIZE: usize = 20;
pub const SLIDING_WINDOW_WIDTH: usize = 5;

pub fn total_pages(total_items: usize, page_size: usize) -> usize {
    if page_size == 0 {
        return 1;
    }
    total_items.div_ceil(page_size).max(1)
}

/// Page position plus what the last fetch returned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageWindow {
    pub page: usize,
    pub page_size: usize,
    pub total_items: usize,
    pub fetched: usize,
}

impl Default for PageWindow {
    fn default() -> Self {
        Self {
            page: 1,
            page_size: DEFAULT_PAGE_SIZE,
            total_items: 0,
            fetched: 0,
        }
    }
}

impl PageWindow {
    pub fn total_pages(&self) -> usize {
        total_pages(self.total_items, self.page_size)
    }

    pub fn is_last_page(&self) -> bool {
        self.page >= self.total_pages() || self.fetched < self.page_size
    }

    pub fn contains_page(&self, page: usize) -> bool {
        (1..=self.total_pages()).contains(&page)
    }

    pub fn from_index(&self) -> usize {
        if self.total_items == 0 {
            return 0;
        }
        (self.page - 1) * self.page_size + 1
    }

    pub fn to_index(&self) -> usize {
        let from = self.from_index();
        if from == 0 || self.fetched == 0 {
            return 0;
        }
        self.total_items.min(from + self.fetched - 1)
    }
}

/// Which page numbers a pager offers for direct navigation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum PageWindowMode {
    #[default]
    All,
    Sliding(usize),
}

impl PageWindowMode {
    pub const SLIDING5: Self = Self::Sliding(SLIDING_WINDOW_WIDTH);

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "all" => Some(Self::All),
            "sliding5" | "sliding" => Some(Self::SLIDING5),
            _ => None,
        }
    }

    pub fn as_str(self) -> String {
        match self {
            Self::All => "all".to_owned(),
            Self::Sliding(width) => format!("sliding{width}"),
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            Self::All => Self::SLIDING5,
            Self::Sliding(_) => Self::All,
        }
    }

    pub fn pages(self, current: usize, total_pages: usize) -> Vec<usize> {
        let total_pages = total_pages.max(1);
        match self {
            Self::All => (1..=total_pages).collect(),
            Self::Sliding(width) => {
                let width = width.max(1).min(total_pages);
                let current = current.clamp(1, total_pages);
                let mut start = current.saturating_sub(width / 2).max(1);
                let end = (start + width - 1).min(total_pages);
                start = (end + 1).saturating_sub(width).max(1);
                (start..=end).collect()
            }
        }
    }
}

pub fn parse_page_size(raw: &str) -> Result<usize> {
    let trimmed = raw.trim();
    let value: i64 = match trimmed.parse() {
        Ok(value) => value,
        Err(_) => bail!("page size {trimmed:?} is not a number -- enter a positive whole number"),
    };
    if value <= 0 {
        bail!("page size must be positive, got {value}");
    }
    Ok(value as usize)
}

#[cfg(test)]
mod tests {
    use super::{PageWindow, PageWindowMode, parse_page_size, total_pages};

    #[test]
    fn total_pages_has_floor_of_one() {
        assert_eq!(total_pages(0, 20), 1);
        assert_eq!(total_pages(1, 20), 1);
        assert_eq!(total_pages(20, 20), 1);
        assert_eq!(total_pages(21, 20), 2);
        assert_eq!(total_pages(47, 20), 3);
    }

    #[test]
    fn total_pages_matches_ceiling_formula_across_grid() {
        for page_size in 1_usize..=12 {
            for total in 0_usize..=60 {
                let expected = std::cmp::max(1, total.div_ceil(page_size));
                assert_eq!(total_pages(total, page_size), expected, "{total}/{page_size}");
            }
        }
    }

    #[test]
    fn empty_result_window() {
        let window = PageWindow {
            page: 1,
            page_size: 20,
            total_items: 0,
            fetched: 0,
        };
        assert_eq!(window.total_pages(), 1);
        assert!(window.is_last_page());
        assert_eq!(window.from_index(), 0);
        assert_eq!(window.to_index(), 0);
    }

    #[test]
    fn short_page_is_last_page() {
        let window = PageWindow {
            page: 3,
            page_size: 20,
            total_items: 47,
            fetched: 7,
        };
        assert_eq!(window.total_pages(), 3);
        assert!(window.is_last_page());
        assert_eq!(window.from_index(), 41);
        assert_eq!(window.to_index(), 47);
    }

    #[test]
    fn full_middle_page_is_not_last() {
        let window = PageWindow {
            page: 2,
            page_size: 20,
            total_items: 47,
            fetched: 20,
        };
        assert!(!window.is_last_page());
        assert_eq!(window.from_index(), 21);
        assert_eq!(window.to_index(), 40);
    }

    #[test]
    fn all_mode_lists_every_page() {
        assert_eq!(PageWindowMode::All.pages(2, 4), vec![1, 2, 3, 4]);
        assert_eq!(PageWindowMode::All.pages(1, 0), vec![1]);
    }

    #[test]
    fn sliding_mode_centres_and_clamps() {
        let mode = PageWindowMode::SLIDING5;
        assert_eq!(mode.pages(1, 10), vec![1, 2, 3, 4, 5]);
        assert_eq!(mode.pages(2, 10), vec![1, 2, 3, 4, 5]);
        assert_eq!(mode.pages(6, 10), vec![4, 5, 6, 7, 8]);
        assert_eq!(mode.pages(10, 10), vec![6, 7, 8, 9, 10]);
        assert_eq!(mode.pages(9, 10), vec![6, 7, 8, 9, 10]);
        assert_eq!(mode.pages(2, 3), vec![1, 2, 3]);
    }

    #[test]
    fn window_mode_parse_and_toggle() {
        assert_eq!(PageWindowMode::parse("all"), Some(PageWindowMode::All));
        assert_eq!(PageWindowMode::parse("Sliding5"), Some(PageWindowMode::SLIDING5));
        assert_eq!(PageWindowMode::parse("pages"), None);
        assert_eq!(PageWindowMode::All.toggled(), PageWindowMode::SLIDING5);
        assert_eq!(PageWindowMode::SLIDING5.as_str(), "sliding5");
    }

    #[test]
    fn page_size_parse_rejects_non_positive_and_garbage() {
        assert_eq!(parse_page_size(" 50 ").expect("valid page size"), 50);
        assert!(parse_page_size("0").is_err());
        assert!(parse_page_size("-5").is_err());
        assert!(parse_page_size("ten").is_err());
        assert!(parse_page_size("NaN").is_err());
    }
}
