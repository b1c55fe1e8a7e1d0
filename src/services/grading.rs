//! Score banding
//!
//! Two independent fixed bandings over `[0, 100]`: the grade letter used in
//! the scorecard and the display color used for score visualization. Both
//! must stay exactly in sync with the grading prompt's scale.

/// Map an overall score to its grade letter
pub fn grade_letter(score: u32) -> &'static str {
    match score {
        90..=u32::MAX => "A",
        80..=89 => "B",
        70..=79 => "C",
        60..=69 => "D",
        _ => "F",
    }
}

/// Display color tier for score visualization
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScoreColor {
    Green,
    Blue,
    Orange,
    Red,
}

impl ScoreColor {
    pub fn hex(self) -> &'static str {
        match self {
            ScoreColor::Green => "#22c55e",
            ScoreColor::Blue => "#3b82f6",
            ScoreColor::Orange => "#f97316",
            ScoreColor::Red => "#ef4444",
        }
    }
}

/// Map a 0-100 score to its display color band
pub fn score_color(score: u32) -> ScoreColor {
    match score {
        80..=u32::MAX => ScoreColor::Green,
        60..=79 => ScoreColor::Blue,
        40..=59 => ScoreColor::Orange,
        _ => ScoreColor::Red,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn grade_bands() {
        assert_eq!(grade_letter(92), "A");
        assert_eq!(grade_letter(85), "B");
        assert_eq!(grade_letter(73), "C");
        assert_eq!(grade_letter(62), "D");
        assert_eq!(grade_letter(40), "F");
    }

    #[test]
    fn grade_band_edges() {
        assert_eq!(grade_letter(100), "A");
        assert_eq!(grade_letter(90), "A");
        assert_eq!(grade_letter(89), "B");
        assert_eq!(grade_letter(60), "D");
        assert_eq!(grade_letter(59), "F");
        assert_eq!(grade_letter(0), "F");
    }

    #[test]
    fn color_bands() {
        assert_eq!(score_color(85), ScoreColor::Green);
        assert_eq!(score_color(70), ScoreColor::Blue);
        assert_eq!(score_color(45), ScoreColor::Orange);
        assert_eq!(score_color(20), ScoreColor::Red);
    }

    #[test]
    fn color_band_edges() {
        assert_eq!(score_color(80), ScoreColor::Green);
        assert_eq!(score_color(79), ScoreColor::Blue);
        assert_eq!(score_color(60), ScoreColor::Blue);
        assert_eq!(score_color(59), ScoreColor::Orange);
        assert_eq!(score_color(40), ScoreColor::Orange);
        assert_eq!(score_color(39), ScoreColor::Red);
    }
}
