//! Classification bands and marker positions.

use crate::calculator::formula::Sex;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Band {
    BelowHealthy,
    Athlete,
    Fitness,
    Normal,
    Obesity,
}

impl Band {
    pub fn label(&self) -> &'static str {
        match self {
            Band::BelowHealthy => "Below healthy",
            Band::Athlete => "Athlete",
            Band::Fitness => "Fitness",
            Band::Normal => "Normal",
            Band::Obesity => "Obesity",
        }
    }

    /// Human readable percentage range of the band for `sex`.
    pub fn range(&self, sex: Sex) -> &'static str {
        match (sex, self) {
            (Sex::Male, Band::BelowHealthy) => "<6%",
            (Sex::Male, Band::Athlete) => "6% to 13%",
            (Sex::Male, Band::Fitness) => "14% to 17%",
            (Sex::Male, Band::Normal) => "18% to 24%",
            (Sex::Male, Band::Obesity) => "≥25%",
            (Sex::Female, Band::BelowHealthy) => "<14%",
            (Sex::Female, Band::Athlete) => "14% to 20%",
            (Sex::Female, Band::Fitness) => "21% to 24%",
            (Sex::Female, Band::Normal) => "25% to 31%",
            (Sex::Female, Band::Obesity) => "≥32%",
        }
    }

    /// Horizontal marker position on the scale, in percent.
    pub fn marker_position(&self) -> u8 {
        match self {
            Band::BelowHealthy => 5,
            Band::Athlete => 20,
            Band::Fitness => 40,
            Band::Normal => 65,
            Band::Obesity => 90,
        }
    }
}

/// Classify a rounded percentage. Upper bounds are inclusive; anything that
/// fails every comparison (NaN included) lands in [`Band::Obesity`].
pub fn classify(sex: Sex, bf: f64) -> Band {
    let (below, athlete, fitness, normal) = match sex {
        Sex::Male => (6.0, 13.0, 17.0, 24.0),
        Sex::Female => (14.0, 20.0, 24.0, 31.0),
    };

    if bf < below {
        Band::BelowHealthy
    } else if bf <= athlete {
        Band::Athlete
    } else if bf <= fitness {
        Band::Fitness
    } else if bf <= normal {
        Band::Normal
    } else {
        Band::Obesity
    }
}
