//! Scenario runner
//!
//! Executes one scenario for one strategy as a strictly linear sequence:
//!
//! ```text
//! Provisioning (if pre-existing > 0) → Insert → [Lookup] → [IndexSize] → Cleanup
//! ```
//!
//! Cleanup runs exactly once whatever happened before it, so no state leaks
//! into the next scenario. Nothing is retried.

use idbench_core::{
    Cleanup, Document, DocumentFactory, Error, IdStrategy, Identifier, MetricBundle, Phase, Result,
    ScenarioDefinition, LOOKUP_PROBES, PROVISION_BATCH_SIZE,
};
use idbench_store::DocumentStore;
use rand::Rng;
use std::time::{Duration, Instant};
use tracing::{debug, error, info};

/// Runs single (scenario, strategy) measurements against a store
pub struct ScenarioRunner<S> {
    store: S,
    provision_batch_size: usize,
    lookup_probes: usize,
}

impl<S: DocumentStore> ScenarioRunner<S> {
    /// Create a runner with the default provisioning batch size and probe count
    pub fn new(store: S) -> Self {
        Self {
            store,
            provision_batch_size: PROVISION_BATCH_SIZE,
            lookup_probes: LOOKUP_PROBES,
        }
    }

    /// Override the batch size used to insert pre-existing documents
    pub fn with_provision_batch_size(mut self, size: usize) -> Self {
        self.provision_batch_size = size.max(1);
        self
    }

    /// Override the number of point lookups averaged per scenario
    pub fn with_lookup_probes(mut self, probes: usize) -> Self {
        self.lookup_probes = probes;
        self
    }

    /// The underlying store
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Measure `scenario` for `strategy`, then clean up
    ///
    /// # Errors
    ///
    /// Any store failure, wrapped with the scenario, strategy and phase. If a
    /// measurement phase fails, its error is returned even when cleanup also
    /// fails; a cleanup failure alone returns `CleanupFailed`.
    pub fn run(&self, scenario: &ScenarioDefinition, strategy: IdStrategy) -> Result<MetricBundle> {
        debug!(
            target: "idbench::runner",
            scenario = scenario.name,
            strategy = %strategy,
            "Run started"
        );

        let measured = self.measure(scenario, strategy);
        let cleaned = self
            .cleanup(scenario.cleanup)
            .map_err(|e| e.in_scenario(scenario.name, strategy, Phase::Cleanup));

        match (measured, cleaned) {
            (Ok(bundle), Ok(())) => {
                info!(
                    target: "idbench::runner",
                    scenario = scenario.name,
                    strategy = %strategy,
                    insert_ms = bundle.insert.as_millis() as u64,
                    lookup_us = bundle.lookup.map(|d| d.as_micros() as u64),
                    index_bytes = bundle.index_bytes,
                    "Run finished"
                );
                Ok(bundle)
            }
            (Err(e), Ok(())) | (Ok(_), Err(e)) => Err(e),
            (Err(e), Err(cleanup_err)) => {
                error!(
                    target: "idbench::runner",
                    scenario = scenario.name,
                    strategy = %strategy,
                    error = %cleanup_err.root(),
                    "Cleanup failed after an earlier failure; collection state is unknown"
                );
                Err(e)
            }
        }
    }

    fn measure(&self, scenario: &ScenarioDefinition, strategy: IdStrategy) -> Result<MetricBundle> {
        let ctx = move |phase: Phase| move |e: Error| e.in_scenario(scenario.name, strategy, phase);

        let mut probes = self
            .provision(scenario, strategy)
            .map_err(ctx(Phase::Provisioning))?;

        // Generated before the clock starts; only round trips are timed.
        let docs = DocumentFactory::generate(strategy, scenario.total_documents);
        let insert = self
            .timed_insert(scenario.batch_size, &docs)
            .map_err(ctx(Phase::Insert))?;

        let lookup = if scenario.measure_lookup {
            if probes.is_empty() {
                probes = self.pick_probes(&docs);
            }
            self.timed_lookups(&probes).map_err(ctx(Phase::Lookup))?
        } else {
            None
        };
        drop(docs);

        let index_bytes = if scenario.measure_index_size {
            Some(
                self.store
                    .index_byte_size()
                    .map_err(ctx(Phase::IndexSize))?,
            )
        } else {
            None
        };

        Ok(MetricBundle {
            insert,
            lookup,
            index_bytes,
        })
    }

    /// Insert the pre-existing documents and return the lookup probes
    ///
    /// Documents are streamed through one reusable buffer. Probe positions
    /// are drawn up front so their identifiers can be captured in passing.
    fn provision(
        &self,
        scenario: &ScenarioDefinition,
        strategy: IdStrategy,
    ) -> Result<Vec<Identifier>> {
        let total = scenario.preexisting_documents;
        if total == 0 {
            return Ok(Vec::new());
        }

        let probe_count = if scenario.measure_lookup {
            self.lookup_probes
        } else {
            0
        };
        let mut rng = rand::thread_rng();
        // (document position, probe slot), ordered by position
        let mut wanted: Vec<(usize, usize)> = (0..probe_count)
            .map(|slot| (rng.gen_range(0..total), slot))
            .collect();
        wanted.sort_unstable();

        let mut probes: Vec<Option<Identifier>> = vec![None; probe_count];
        let mut next = 0;
        let mut buf = Vec::with_capacity(self.provision_batch_size.min(total));
        let mut offset = 0;

        while offset < total {
            let len = self.provision_batch_size.min(total - offset);
            DocumentFactory::generate_into(strategy, &mut buf, len);
            while next < wanted.len() && wanted[next].0 < offset + len {
                let (position, slot) = wanted[next];
                probes[slot] = Some(buf[position - offset].id);
                next += 1;
            }
            self.store.insert_batch(&buf)?;
            offset += len;
        }

        debug!(
            target: "idbench::runner",
            scenario = scenario.name,
            documents = total,
            "Provisioned pre-existing documents"
        );
        Ok(probes.into_iter().flatten().collect())
    }

    fn timed_insert(&self, batch_size: Option<usize>, docs: &[Document]) -> Result<Duration> {
        let start = Instant::now();
        match batch_size {
            Some(size) => {
                for chunk in docs.chunks(size.max(1)) {
                    self.store.insert_batch(chunk)?;
                }
            }
            None => {
                for doc in docs {
                    self.store.insert_one(doc)?;
                }
            }
        }
        Ok(start.elapsed())
    }

    /// Draw probes uniformly, with replacement, from `docs`
    fn pick_probes(&self, docs: &[Document]) -> Vec<Identifier> {
        if docs.is_empty() {
            return Vec::new();
        }
        let mut rng = rand::thread_rng();
        (0..self.lookup_probes)
            .map(|_| docs[rng.gen_range(0..docs.len())].id)
            .collect()
    }

    /// Mean duration of sequential point lookups; `None` without probes
    fn timed_lookups(&self, probes: &[Identifier]) -> Result<Option<Duration>> {
        if probes.is_empty() {
            return Ok(None);
        }
        let start = Instant::now();
        for id in probes {
            self.store.find_by_id(id)?;
        }
        let elapsed = start.elapsed();
        let mean = elapsed.as_nanos() / probes.len() as u128;
        Ok(Some(Duration::from_nanos(mean as u64)))
    }

    fn cleanup(&self, cleanup: Cleanup) -> Result<()> {
        match cleanup {
            Cleanup::Drop => self.store.drop_collection(),
            Cleanup::Clear => self.store.clear(),
        }
    }
}
