use std::collections::BTreeMap;

/// Deadlines keyed by purpose, measured on the engine's active tick counter.
///
/// Arming a purpose that is already pending replaces its deadline, so a timer
/// can never be scheduled twice.
#[derive(Clone, Debug)]
pub struct TimerTable<K: Ord + Copy> {
    deadlines: BTreeMap<K, u64>,
}

impl<K: Ord + Copy> Default for TimerTable<K> {
    fn default() -> Self {
        Self {
            deadlines: BTreeMap::new(),
        }
    }
}

impl<K: Ord + Copy> TimerTable<K> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn arm(&mut self, kind: K, now_tick: u64, after_ticks: u64) {
        self.deadlines.insert(kind, now_tick.saturating_add(after_ticks));
    }

    pub fn cancel(&mut self, kind: K) -> bool {
        self.deadlines.remove(&kind).is_some()
    }

    pub fn clear(&mut self) {
        self.deadlines.clear();
    }

    pub fn deadline(&self, kind: K) -> Option<u64> {
        self.deadlines.get(&kind).copied()
    }

    pub fn len(&self) -> usize {
        self.deadlines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.deadlines.is_empty()
    }

    /// Removes and returns every timer whose deadline is at or before `now_tick`,
    /// earliest first.
    pub fn take_due(&mut self, now_tick: u64) -> Vec<K> {
        let mut due: Vec<(u64, K)> = self
            .deadlines
            .iter()
            .filter(|(_, at)| **at <= now_tick)
            .map(|(&kind, &at)| (at, kind))
            .collect();
        due.sort_by(|a, b| a.0.cmp(&b.0).then(a.1.cmp(&b.1)));
        for (_, kind) in &due {
            self.deadlines.remove(kind);
        }
        due.into_iter().map(|(_, kind)| kind).collect()
    }
}
