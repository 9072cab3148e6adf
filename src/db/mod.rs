pub(crate) mod filter;

use std::collections::{BTreeMap, HashMap, HashSet};
use chrono::NaiveDate;
use log::{info, warn};
use crate::common::TrackerError;
use crate::form::NewRecord;
use crate::store::Store;
use crate::transaction::Transaction;
use filter::Condition;

/// In-memory table of all transactions, backed by a `Store`.
pub(crate) struct Ledger {
    store: Box<dyn Store>,

    /// Next id to hand out, None once u32::MAX is taken
    transaction_id_seed: Option<u32>,
    transactions: HashMap<u32, Transaction>,

    /// Key is transaction date, value is a list of transaction ids.
    date_index: BTreeMap<NaiveDate, Vec<u32>>,

    pub(crate) last_query_results: Option<Vec<u32>>,
}

impl Ledger {
    /// Load every transaction from the store into memory
    pub(crate) fn open(mut store: Box<dyn Store>) -> anyhow::Result<Ledger> {
        let loaded = store.load()?;
        let mut ledger = Ledger {
            store,
            transaction_id_seed: Some(1),
            transactions: HashMap::new(),
            date_index: BTreeMap::new(),
            last_query_results: None,
        };

        for t in loaded {
            if ledger.transactions.contains_key(&t.id) {
                warn!("Duplicate transaction id {} in {}, keeping the last one", t.id, ledger.store.location().display());
                ledger.unindex(t.id);
            }
            ledger.index(t);
        }
        info!("Loaded {} transactions from {}", ledger.len(), ledger.store.location().display());

        Ok(ledger)
    }

    fn index(&mut self, t: Transaction) {
        if let Some(seed) = self.transaction_id_seed {
            if t.id >= seed {
                self.transaction_id_seed = t.id.checked_add(1);
            }
        }
        self.date_index.entry(t.date.date()).or_default().push(t.id);
        self.transactions.insert(t.id, t);
    }

    fn unindex(&mut self, id: u32) -> Option<Transaction> {
        let t = self.transactions.remove(&id)?;
        let date = t.date.date();
        if let Some(ids) = self.date_index.get_mut(&date) {
            ids.retain(|existing_id| *existing_id != id);
            if ids.is_empty() {
                self.date_index.remove(&date);
            }
        }
        Some(t)
    }

    /// Save a validated record. The ledger only changes once the store accepted it.
    pub(crate) fn insert(&mut self, record: NewRecord) -> anyhow::Result<Transaction> {
        let id = self.transaction_id_seed
            .ok_or_else(|| TrackerError::InvalidRecord("id space exhausted".into()))?;
        let t = Transaction::new(id, record.date, record.kind, &record.category, record.amount, &record.description);
        self.store.append(&t)?;
        self.index(t.clone());
        Ok(t)
    }

    /// Delete transactions by id, returns the number actually removed.
    pub(crate) fn delete(&mut self, ids: &[u32]) -> anyhow::Result<usize> {
        let existing: Vec<u32> = ids.iter()
            .filter(|id| self.transactions.contains_key(id))
            .cloned()
            .collect::<HashSet<u32>>()
            .into_iter()
            .collect();
        if existing.is_empty() {
            return Ok(0);
        }

        self.store.delete(&existing)?;
        for id in &existing {
            self.unindex(*id);
        }
        if let Some(last) = self.last_query_results.as_mut() {
            last.retain(|id| !existing.contains(id));
        }
        Ok(existing.len())
    }

    /// Filter transactions based on the given condition.
    /// Returns the set of transaction ids after applying the filter.
    fn filter_transactions(&self, transactions: &HashSet<u32>, condition: &Condition) -> HashSet<u32> {
        match condition {
            Condition::Date(date_range) => {
                let mut trans_in_date_range = HashSet::<u32>::new();
                // BTreeMap::range panics on an inverted range
                if date_range.start >= date_range.end {
                    return trans_in_date_range;
                }
                for (_, trans_ids) in self.date_index.range(date_range.clone()) {
                    for id in trans_ids {
                        if transactions.contains(id) {
                            trans_in_date_range.insert(*id);
                        }
                    }
                }
                trans_in_date_range
            },

            Condition::And(sub_conditions) => {
                let c1_result = self.filter_transactions(transactions, &sub_conditions.0);
                self.filter_transactions(&c1_result, &sub_conditions.1)
            },

            Condition::Or(sub_conditions) => {
                let c1_result = self.filter_transactions(transactions, &sub_conditions.0);
                let c2_result = self.filter_transactions(transactions, &sub_conditions.1);
                c1_result.union(&c2_result).cloned().collect()
            },

            _ => transactions.iter()
                .filter(|id| self.transactions.get(id).map_or(false, |t| condition.matches(t)))
                .cloned()
                .collect()
        }
    }

    /// Transactions matching `condition` (all when None), ordered by date then id.
    pub(crate) fn query(&mut self, condition: Option<&Condition>) -> Vec<Transaction> {
        let mut ids: HashSet<u32> = self.transactions.keys().cloned().collect();
        if let Some(condition) = condition {
            ids = self.filter_transactions(&ids, condition);
        }

        let mut results: Vec<Transaction> = ids.iter()
            .filter_map(|id| self.transactions.get(id))
            .cloned()
            .collect();
        results.sort_by(|a, b| a.date.cmp(&b.date).then(a.id.cmp(&b.id)));

        self.last_query_results = Some(results.iter().map(|t| t.id).collect());
        results
    }

    /// Every transaction ordered by date then id. Does not touch the last query results.
    pub(crate) fn all(&self) -> Vec<Transaction> {
        let mut results: Vec<Transaction> = self.transactions.values().cloned().collect();
        results.sort_by(|a, b| a.date.cmp(&b.date).then(a.id.cmp(&b.id)));
        results
    }

    pub(crate) fn find_by_id(&self, id: u32) -> Option<Transaction> {
        self.transactions.get(&id).cloned()
    }

    pub(crate) fn len(&self) -> usize {
        self.transactions.len()
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.transactions.is_empty()
    }
}
