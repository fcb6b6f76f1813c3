use regex::Regex;
use std::sync::LazyLock;

use moviemeta_core::ports::{GuessedName, NameGuesser};

// Extensions stripped before guessing. Anything else short and alphabetic is
// treated as an extension too (see `strip_extension`).
const KNOWN_EXTS: &[&str] = &[
  "mkv", "mp4", "avi", "mov", "wmv", "m4v", "mpg", "mpeg", "ts", "webm", "flv", "iso", "vob", "srt", "sub", "nfo",
];

// Release group prefix: "[Group] Title ..."
static GROUP_PREFIX: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^\s*\[[^\]]*\]\s*").unwrap());

// A plausible release year, preceded by a separator so a leading number
// ("2001 A Space Odyssey") is kept as part of the title.
static YEAR: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[\s(\[]((?:19|20)\d{2})(?:[\s)\]]|$)").unwrap());

// Quality / encoding markers: the title never continues past one of these.
static JUNK: LazyLock<Regex> = LazyLock::new(|| {
  Regex::new(
    r"(?i)\b(?:2160p|1080p|720p|480p|4k|bluray|blu-ray|brrip|bdrip|webrip|web-dl|hdtv|dvdrip|hdrip|x264|x265|h264|hevc|xvid|aac|ac3|dts|proper|repack|extended|unrated|remastered)\b",
  )
  .unwrap()
});

static MULTIPLE_SPACES: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s{2,}").unwrap());

/// Regex-based guesser for scene-style and plain file names.
///
/// Handles `The.Matrix.1999.1080p.BluRay.mkv`, `Heat (1995).avi` and
/// `Alien.mkv`. It is a heuristic: anything it cannot read yields an empty
/// guess, which the pipeline still turns into one (error) record.
#[derive(Debug, Clone, Default)]
pub struct FilenameGuesser;

impl FilenameGuesser {
  pub fn new() -> Self {
    Self
  }
}

fn strip_extension(name: &str) -> &str {
  let Some((stem, ext)) = name.rsplit_once('.') else {
    return name;
  };

  let lower = ext.to_ascii_lowercase();
  let looks_like_ext = (3..=4).contains(&ext.len())
    && ext.chars().all(|c| c.is_ascii_alphanumeric())
    && ext.chars().any(|c| c.is_ascii_alphabetic());

  if KNOWN_EXTS.contains(&lower.as_str()) || looks_like_ext { stem } else { name }
}

fn clean_title(raw: &str) -> Option<String> {
  let cut = match JUNK.find(raw) {
    Some(m) => &raw[..m.start()],
    None => raw,
  };

  let collapsed = MULTIPLE_SPACES.replace_all(cut, " ");
  let title = collapsed.trim_matches(|c: char| c.is_whitespace() || matches!(c, '-' | '(' | '[' | ')' | ']'));

  (!title.is_empty()).then(|| title.to_string())
}

impl NameGuesser for FilenameGuesser {
  fn guess(&self, file_name: &str) -> GuessedName {
    let stem = strip_extension(file_name);
    let spaced = stem.replace(['.', '_'], " ");
    let name = GROUP_PREFIX.replace(&spaced, "");

    match YEAR.captures(&name) {
      Some(caps) => {
        let whole = caps.get(0).map(|m| m.start()).unwrap_or(0);
        let year = caps.get(1).and_then(|m| m.as_str().parse::<u16>().ok());
        GuessedName::new(clean_title(&name[..whole]), year)
      }
      None => GuessedName::new(clean_title(&name), None),
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn guess(name: &str) -> (Option<String>, Option<u16>) {
    let g = FilenameGuesser::new().guess(name);
    (g.title, g.year)
  }

  #[test]
  fn scene_name_with_year_and_quality() {
    assert_eq!(guess("The.Matrix.1999.1080p.BluRay.x264.mkv"), (Some("The Matrix".into()), Some(1999)));
  }

  #[test]
  fn parenthesised_year() {
    assert_eq!(guess("Heat (1995).avi"), (Some("Heat".into()), Some(1995)));
  }

  #[test]
  fn title_only() {
    assert_eq!(guess("Alien.mkv"), (Some("Alien".into()), None));
    assert_eq!(guess("Inception.720p.WEB-DL.mp4"), (Some("Inception".into()), None));
  }

  #[test]
  fn leading_number_is_part_of_title() {
    assert_eq!(guess("2001.A.Space.Odyssey.1968.mkv"), (Some("2001 A Space Odyssey".into()), Some(1968)));
  }

  #[test]
  fn release_group_prefix_is_dropped() {
    assert_eq!(guess("[Group] Blade Runner 1982.mkv"), (Some("Blade Runner".into()), Some(1982)));
  }

  #[test]
  fn nothing_to_guess() {
    assert_eq!(guess(".mkv"), (None, None));
  }
}
