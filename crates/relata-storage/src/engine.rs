//! StorageEngine: owns the connection pool, runs migrations on open, and implements
//! `IReportStore`. Write helpers are used by ingestion and test setup.

use std::path::Path;

use rusqlite::Connection;
use serde_json::Value;
use tracing::{info, warn};

use relata_core::config::StorageConfig;
use relata_core::errors::RelataResult;
use relata_core::intent::Direction;
use relata_core::retrieval::{
    CompanyCount, CompanyUsage, ReportFilter, SectionHit, StatsSummary, TermCount,
};
use relata_core::terms::{
    ReportTermLink, SectionEmbedding, SectionKind, TechnicalTerm, TermCategory,
};
use relata_core::traits::IReportStore;
use relata_core::Report;

use crate::ingest::{self, IngestOutcome};
use crate::migrations;
use crate::pool::pragmas::verify_wal_mode;
use crate::pool::ConnectionPool;
use crate::queries::{aggregation, report_query, section_search, term_query};

/// The relational store.
pub struct StorageEngine {
    pool: ConnectionPool,
    /// False in in-memory mode, where read pool connections are isolated databases.
    use_read_pool: bool,
}

impl StorageEngine {
    /// Open (or create) a database file.
    pub fn open(path: &Path, config: &StorageConfig) -> RelataResult<Self> {
        let pool = ConnectionPool::open(path, config)?;
        let engine = Self {
            pool,
            use_read_pool: true,
        };
        let version = engine.initialize()?;
        if config.wal_mode && !engine.with_writer(verify_wal_mode)? {
            warn!(path = %path.display(), "WAL mode requested but not active");
        }
        info!(path = %path.display(), version, "storage opened");
        Ok(engine)
    }

    /// In-memory store for tests. Reads go through the writer.
    pub fn open_in_memory() -> RelataResult<Self> {
        let pool = ConnectionPool::open_in_memory()?;
        let engine = Self {
            pool,
            use_read_pool: false,
        };
        engine.initialize()?;
        Ok(engine)
    }

    fn initialize(&self) -> RelataResult<u32> {
        self.pool.writer.with_conn(migrations::run_migrations)
    }

    pub fn pool(&self) -> &ConnectionPool {
        &self.pool
    }

    /// Run a read on the best available connection.
    pub fn with_reader<F, T>(&self, f: F) -> RelataResult<T>
    where
        F: FnOnce(&Connection) -> RelataResult<T>,
    {
        if self.use_read_pool {
            self.pool.readers.with_conn(f)
        } else {
            self.pool.writer.with_conn(f)
        }
    }

    /// Run a closure on the single write connection.
    pub fn with_writer<F, T>(&self, f: F) -> RelataResult<T>
    where
        F: FnOnce(&Connection) -> RelataResult<T>,
    {
        self.pool.writer.with_conn(f)
    }

    pub fn ingest_report(
        &self,
        origin_folder: &str,
        origin_file: &str,
        payload: &Value,
    ) -> RelataResult<IngestOutcome> {
        self.with_writer(|conn| ingest::ingest_report(conn, origin_folder, origin_file, payload))
    }

    pub fn insert_term(
        &self,
        term: &str,
        category: TermCategory,
        normalized: &str,
        description: Option<&str>,
    ) -> RelataResult<i64> {
        self.with_writer(|conn| term_query::insert_term(conn, term, category, normalized, description))
    }

    pub fn link_term(
        &self,
        report_id: i64,
        normalized: &str,
        section: SectionKind,
        frequency: u32,
    ) -> RelataResult<()> {
        self.with_writer(|conn| term_query::link_term(conn, report_id, normalized, section, frequency))
    }

    pub fn insert_section_embedding(
        &self,
        report_id: i64,
        section: SectionKind,
        content: &str,
        embedding: &[f32],
        model: &str,
    ) -> RelataResult<i64> {
        self.with_writer(|conn| {
            section_search::insert_section_embedding(conn, report_id, section, content, embedding, model)
        })
    }

    pub fn report_links(&self, report_id: i64) -> RelataResult<Vec<ReportTermLink>> {
        self.with_reader(|conn| term_query::report_links(conn, report_id))
    }

    pub fn section_embeddings(&self, report_id: i64) -> RelataResult<Vec<SectionEmbedding>> {
        self.with_reader(|conn| section_search::section_embeddings(conn, report_id))
    }

    /// Rows that fail metadata validation.
    pub fn count_invalid_reports(&self) -> RelataResult<u64> {
        self.with_reader(aggregation::count_invalid_reports)
    }

    pub fn schema_version(&self) -> RelataResult<u32> {
        self.with_reader(migrations::current_version)
    }
}

impl IReportStore for StorageEngine {
    fn get_report(&self, id: i64) -> RelataResult<Option<Report>> {
        self.with_reader(|conn| report_query::get_report(conn, id))
    }

    fn reports_for_company(
        &self,
        filter: &ReportFilter,
        limit: usize,
    ) -> RelataResult<Vec<Report>> {
        self.with_reader(|conn| report_query::reports_matching(conn, filter, limit))
    }

    fn term_ranking(
        &self,
        filter: &ReportFilter,
        direction: Direction,
        limit: usize,
    ) -> RelataResult<Vec<TermCount>> {
        self.with_reader(|conn| aggregation::term_ranking(conn, filter, direction, limit))
    }

    fn company_ranking(
        &self,
        filter: &ReportFilter,
        direction: Direction,
        limit: usize,
    ) -> RelataResult<Vec<CompanyCount>> {
        self.with_reader(|conn| aggregation::company_ranking(conn, filter, direction, limit))
    }

    fn companies_using_term(
        &self,
        term: &str,
        filter: &ReportFilter,
    ) -> RelataResult<Vec<CompanyUsage>> {
        self.with_reader(|conn| aggregation::companies_using_term(conn, term, filter))
    }

    fn summary(&self, filter: &ReportFilter) -> RelataResult<StatsSummary> {
        self.with_reader(|conn| aggregation::summary(conn, filter))
    }

    fn nearest_sections(
        &self,
        query: &[f32],
        filter: &ReportFilter,
        sections: &[SectionKind],
        limit: usize,
    ) -> RelataResult<Vec<SectionHit>> {
        self.with_reader(|conn| section_search::nearest_sections(conn, query, filter, sections, limit))
    }

    fn known_terms(&self) -> RelataResult<Vec<TechnicalTerm>> {
        self.with_reader(term_query::known_terms)
    }

    fn known_companies(&self) -> RelataResult<Vec<String>> {
        self.with_reader(report_query::known_companies)
    }
}
