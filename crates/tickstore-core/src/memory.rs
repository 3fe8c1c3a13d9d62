use std::collections::{BTreeSet, HashMap};
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::assembler::SeriesPoint;
use crate::store::{Deadline, StoreError, TickStore, WriteReport};
use crate::{Observation, QueryDescriptor, Symbol, UtcDateTime};

#[derive(Debug, Clone, Copy)]
struct Tick {
    ts_us: i64,
    seq: u64,
    price: f64,
    volume: i64,
}

/// In-process [`TickStore`] used for tests, demos and the `memory` backend.
///
/// Can be switched offline to simulate an unreachable backend.
#[derive(Debug)]
pub struct MemoryStore {
    ticks: RwLock<HashMap<Symbol, Vec<Tick>>>,
    next_seq: AtomicU64,
    online: AtomicBool,
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryStore {
    pub fn new() -> Self {
        Self {
            ticks: RwLock::new(HashMap::new()),
            next_seq: AtomicU64::new(0),
            online: AtomicBool::new(true),
        }
    }

    pub fn set_online(&self, online: bool) {
        self.online.store(online, Ordering::SeqCst);
    }

    pub fn is_online(&self) -> bool {
        self.online.load(Ordering::SeqCst)
    }

    /// Number of stored observations across all symbols.
    pub fn len(&self) -> usize {
        self.read()
            .map(|ticks| ticks.values().map(Vec::len).sum())
            .unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn ensure_online(&self) -> Result<(), StoreError> {
        if self.is_online() {
            Ok(())
        } else {
            Err(StoreError::unavailable("memory store is offline"))
        }
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, HashMap<Symbol, Vec<Tick>>>, StoreError> {
        self.ticks
            .read()
            .map_err(|_| StoreError::unavailable("memory store lock poisoned"))
    }

    fn write_lock(&self) -> Result<RwLockWriteGuard<'_, HashMap<Symbol, Vec<Tick>>>, StoreError> {
        self.ticks
            .write()
            .map_err(|_| StoreError::unavailable("memory store lock poisoned"))
    }

    fn tick(&self, observation: &Observation) -> Tick {
        Tick {
            ts_us: observation.timestamp().unix_micros(),
            seq: self.next_seq.fetch_add(1, Ordering::SeqCst),
            price: observation.price(),
            volume: observation.volume(),
        }
    }
}

impl TickStore for MemoryStore {
    fn name(&self) -> &'static str {
        "memory"
    }

    fn write(&self, observation: &Observation, deadline: Deadline) -> Result<(), StoreError> {
        self.ensure_online()?;
        deadline.check("write")?;
        let tick = self.tick(observation);
        self.write_lock()?
            .entry(observation.symbol().clone())
            .or_default()
            .push(tick);
        Ok(())
    }

    fn write_batch(
        &self,
        observations: &[Observation],
        deadline: Deadline,
    ) -> Result<WriteReport, StoreError> {
        self.ensure_online()?;
        deadline.check("write_batch")?;
        let mut ticks = self.write_lock()?;
        for observation in observations {
            let tick = self.tick(observation);
            ticks
                .entry(observation.symbol().clone())
                .or_default()
                .push(tick);
        }
        Ok(WriteReport::all_accepted(observations.len()))
    }

    fn query_rows(
        &self,
        descriptor: &QueryDescriptor,
        deadline: Deadline,
    ) -> Result<Vec<SeriesPoint>, StoreError> {
        self.ensure_online()?;
        deadline.check("query")?;

        let start_us = descriptor.window.start.unix_micros();
        let end_us = descriptor.window.end.unix_micros();
        let interval = descriptor.interval;

        // bucket start -> (last tick key, last price, summed volume)
        let mut buckets: HashMap<i64, ((i64, u64), f64, i64)> = HashMap::new();
        let ticks = self.read()?;
        for tick in ticks
            .get(&descriptor.symbol)
            .into_iter()
            .flatten()
            .filter(|tick| start_us <= tick.ts_us && tick.ts_us <= end_us)
        {
            let key = (tick.ts_us, tick.seq);
            let bucket = buckets
                .entry(interval.bucket_start_micros(tick.ts_us))
                .or_insert((key, tick.price, 0));
            if key >= bucket.0 {
                bucket.0 = key;
                bucket.1 = tick.price;
            }
            bucket.2 = bucket.2.saturating_add(tick.volume);
        }
        drop(ticks);

        let mut rows = buckets
            .into_iter()
            .map(|(bucket_us, (_, price, volume))| {
                UtcDateTime::from_unix_micros(bucket_us)
                    .map(|timestamp| SeriesPoint::new(timestamp, price, volume))
                    .map_err(|err| StoreError::query_failed(err.to_string()))
            })
            .collect::<Result<Vec<_>, _>>()?;
        rows.sort_by_key(|row| row.timestamp);

        if let Some(limit) = descriptor.limit {
            if rows.len() > limit {
                rows.drain(..rows.len() - limit);
            }
        }
        Ok(rows)
    }

    fn list_symbols(&self, deadline: Deadline) -> Result<BTreeSet<Symbol>, StoreError> {
        self.ensure_online()?;
        deadline.check("list_symbols")?;
        Ok(self
            .read()?
            .iter()
            .filter(|(_, ticks)| !ticks.is_empty())
            .map(|(symbol, _)| symbol.clone())
            .collect())
    }

    fn ping(&self, deadline: Deadline) -> bool {
        self.is_online() && !deadline.is_expired()
    }
}
