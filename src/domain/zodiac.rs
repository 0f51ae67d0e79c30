use chrono::Datelike;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WesternSign {
    Aries,
    Taurus,
    Gemini,
    Cancer,
    Leo,
    Virgo,
    Libra,
    Scorpio,
    Sagittarius,
    Capricorn,
    Aquarius,
    Pisces,
}

impl WesternSign {
    pub const ALL: [WesternSign; 12] = [
        WesternSign::Aries,
        WesternSign::Taurus,
        WesternSign::Gemini,
        WesternSign::Cancer,
        WesternSign::Leo,
        WesternSign::Virgo,
        WesternSign::Libra,
        WesternSign::Scorpio,
        WesternSign::Sagittarius,
        WesternSign::Capricorn,
        WesternSign::Aquarius,
        WesternSign::Pisces,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            WesternSign::Aries => "Aries",
            WesternSign::Taurus => "Taurus",
            WesternSign::Gemini => "Gemini",
            WesternSign::Cancer => "Cancer",
            WesternSign::Leo => "Leo",
            WesternSign::Virgo => "Virgo",
            WesternSign::Libra => "Libra",
            WesternSign::Scorpio => "Scorpio",
            WesternSign::Sagittarius => "Sagittarius",
            WesternSign::Capricorn => "Capricorn",
            WesternSign::Aquarius => "Aquarius",
            WesternSign::Pisces => "Pisces",
        }
    }
}

impl fmt::Display for WesternSign {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for WesternSign {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        WesternSign::ALL
            .iter()
            .copied()
            .find(|sign| sign.as_str() == s)
            .ok_or(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ChineseSign {
    Rat,
    Ox,
    Tiger,
    Rabbit,
    Dragon,
    Snake,
    Horse,
    Goat,
    Monkey,
    Rooster,
    Dog,
    Boar,
}

impl ChineseSign {
    /// Cycle order, starting from the anchor year.
    pub const ALL: [ChineseSign; 12] = [
        ChineseSign::Rat,
        ChineseSign::Ox,
        ChineseSign::Tiger,
        ChineseSign::Rabbit,
        ChineseSign::Dragon,
        ChineseSign::Snake,
        ChineseSign::Horse,
        ChineseSign::Goat,
        ChineseSign::Monkey,
        ChineseSign::Rooster,
        ChineseSign::Dog,
        ChineseSign::Boar,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ChineseSign::Rat => "Rat",
            ChineseSign::Ox => "Ox",
            ChineseSign::Tiger => "Tiger",
            ChineseSign::Rabbit => "Rabbit",
            ChineseSign::Dragon => "Dragon",
            ChineseSign::Snake => "Snake",
            ChineseSign::Horse => "Horse",
            ChineseSign::Goat => "Goat",
            ChineseSign::Monkey => "Monkey",
            ChineseSign::Rooster => "Rooster",
            ChineseSign::Dog => "Dog",
            ChineseSign::Boar => "Boar",
        }
    }
}

impl fmt::Display for ChineseSign {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ChineseSign {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ChineseSign::ALL
            .iter()
            .copied()
            .find(|sign| sign.as_str() == s)
            .ok_or(())
    }
}

/// First (month, day) of each sign, in calendar order.
/// Dates before Jan 20 wrap around to Capricorn.
const WESTERN_STARTS: &[(u32, u32, WesternSign)] = &[
    (1, 20, WesternSign::Aquarius),
    (2, 19, WesternSign::Pisces),
    (3, 21, WesternSign::Aries),
    (4, 20, WesternSign::Taurus),
    (5, 21, WesternSign::Gemini),
    (6, 21, WesternSign::Cancer),
    (7, 23, WesternSign::Leo),
    (8, 23, WesternSign::Virgo),
    (9, 23, WesternSign::Libra),
    (10, 23, WesternSign::Scorpio),
    (11, 22, WesternSign::Sagittarius),
    (12, 22, WesternSign::Capricorn),
];

const CHINESE_ANCHOR_YEAR: i32 = 2020;

pub fn western_zodiac<D: Datelike>(date: &D) -> WesternSign {
    let key = (date.month(), date.day());

    WESTERN_STARTS
        .iter()
        .rev()
        .find(|&&(month, day, _)| (month, day) <= key)
        .map(|&(_, _, sign)| sign)
        .unwrap_or(WesternSign::Capricorn)
}

pub fn chinese_zodiac(year: i32) -> ChineseSign {
    let offset = (year - CHINESE_ANCHOR_YEAR).rem_euclid(12) as usize;
    ChineseSign::ALL[offset]
}
