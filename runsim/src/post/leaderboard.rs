use helpers::general::{argsort, format_finish_time, SortOrder};
use serde::{Deserialize, Serialize};

/// ScoreEntry stores one finished run for the session leaderboard.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct ScoreEntry {
    pub participant: String,
    pub time_s: f64,
}

/// Leaderboard collects the score entries of one session. Entries are kept in insertion
/// order and sorted ascending by time on read, so ties keep their insertion order. There
/// is no dedup and no cap on growth; only the top entries are surfaced for display.
#[derive(Debug, Default)]
pub struct Leaderboard {
    entries: Vec<ScoreEntry>,
}

impl Leaderboard {
    pub fn new() -> Leaderboard {
        Leaderboard {
            entries: Vec::new(),
        }
    }

    pub fn record(&mut self, entry: ScoreEntry) {
        self.entries.push(entry);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// top_n returns the best n entries sorted ascending by finish time.
    pub fn top_n(&self, n: usize) -> Vec<ScoreEntry> {
        let times: Vec<f64> = self.entries.iter().map(|e| e.time_s).collect();

        argsort(&times, SortOrder::Ascending)
            .into_iter()
            .take(n)
            .map(|idx| self.entries[idx].clone())
            .collect()
    }

    /// print_standings prints the top 10 to the console, with medal decoration for the
    /// first three ranks.
    pub fn print_standings(&self) {
        println!("RESULT: Leaderboard");

        for (rank, entry) in self.top_n(10).iter().enumerate() {
            let medal = match rank {
                0 => " 🥇",
                1 => " 🥈",
                2 => " 🥉",
                _ => "",
            };
            println!(
                "{:2}. {} — {}{}",
                rank + 1,
                entry.participant,
                format_finish_time(entry.time_s),
                medal
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(participant: &str, time_s: f64) -> ScoreEntry {
        ScoreEntry {
            participant: participant.to_owned(),
            time_s,
        }
    }

    #[test]
    fn top_n_sorts_ascending_by_time() {
        let mut lb = Leaderboard::new();
        lb.record(entry("C", 30.0));
        lb.record(entry("A", 10.0));
        lb.record(entry("B", 20.0));

        let top = lb.top_n(10);
        let names: Vec<&str> = top.iter().map(|e| e.participant.as_str()).collect();
        assert_eq!(names, vec!["A", "B", "C"]);
    }

    #[test]
    fn ties_keep_insertion_order() {
        let mut lb = Leaderboard::new();
        lb.record(entry("first", 15.0));
        lb.record(entry("second", 15.0));
        lb.record(entry("faster", 12.0));
        lb.record(entry("third", 15.0));

        let top = lb.top_n(10);
        let names: Vec<&str> = top.iter().map(|e| e.participant.as_str()).collect();
        assert_eq!(names, vec!["faster", "first", "second", "third"]);
    }

    #[test]
    fn top_n_caps_the_returned_entries() {
        let mut lb = Leaderboard::new();
        for i in 0..25 {
            lb.record(entry(&format!("runner{}", i), 100.0 - i as f64));
        }

        assert_eq!(lb.len(), 25);
        let top = lb.top_n(10);
        assert_eq!(top.len(), 10);
        assert_eq!(top[0].participant, "runner24");
    }
}
