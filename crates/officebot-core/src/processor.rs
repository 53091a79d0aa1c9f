//! Page processing
//!
//! One page at a time:
//! 1. read the infobox (template plus redirect aliases)
//! 2. group fields and resolve every record; any failure discards the page
//! 3. fetch the entity's position-held statements
//! 4. merge each statement against a snapshot that accumulates earlier
//!    decisions of the same page
//! 5. commit all edits in one call unless running dry
//! 6. optionally strip the transferred fields from the source page

use crate::config::TransferConfig;
use crate::error::{PipelineError, PipelineResult};
use chrono::Datelike;
use officebot_extract::{group_positions, strip_transferred_fields, PairWarning, TemplateFieldSet};
use officebot_merge::{MergeDecision, MergeEngine};
use officebot_model::{
    props, Claim, EntityId, ExistingStatement, ModelError, Source, Statement, StatementId,
    WikiDate,
};
use officebot_resolve::{
    Collaborators, CommitReceipt, Lexicon, RecordResolver, SkippedQualifier, StatementEdit,
    WikiPage,
};
use serde::Serialize;
use std::collections::HashMap;

/// What happened to a page
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PageStatus {
    /// Listed in the ignored pages
    Ignored,
    /// No infobox, or an empty one
    NoInfobox,
    /// Infobox without position fields
    NoPositions,
    /// Edits planned but not committed
    DryRun,
    /// Edits committed
    Committed,
    /// Every statement already present
    UpToDate,
}

/// Outcome of one position record
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RecordReport {
    pub index: String,
    pub title: String,
    pub title_inherited: bool,
    pub office: Option<EntityId>,
    pub skipped: Vec<SkippedQualifier>,
    pub warnings: Vec<PairWarning>,
}

/// Everything done to one page
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PageReport {
    pub page: WikiPage,
    pub status: PageStatus,
    pub entity: Option<EntityId>,
    pub records: Vec<RecordReport>,
    pub decisions: Vec<MergeDecision>,
    pub edits: Vec<StatementEdit>,
    pub receipt: Option<CommitReceipt>,
    pub stripped: bool,
}

impl PageReport {
    fn new(page: &WikiPage, status: PageStatus) -> Self {
        Self {
            page: page.clone(),
            status,
            entity: None,
            records: Vec::new(),
            decisions: Vec::new(),
            edits: Vec::new(),
            receipt: None,
            stripped: false,
        }
    }
}

/// A page that failed
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PageFailure {
    pub page: WikiPage,
    pub error: String,
}

/// Reports of a run over several pages
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RunSummary {
    pub reports: Vec<PageReport>,
    pub failures: Vec<PageFailure>,
}

impl RunSummary {
    /// Pages whose edits were committed or planned
    #[must_use]
    pub fn written(&self) -> usize {
        self.reports
            .iter()
            .filter(|r| matches!(r.status, PageStatus::Committed | PageStatus::DryRun))
            .count()
    }
}

/// Pending edits keyed by the snapshot id they touch
#[derive(Default)]
struct EditPlan {
    edits: Vec<StatementEdit>,
    by_id: HashMap<StatementId, usize>,
}

impl EditPlan {
    /// Record a decision and fold it into the snapshot
    fn apply(&mut self, decision: &MergeDecision, snapshot: &mut Vec<ExistingStatement>) {
        match decision {
            MergeDecision::Create(statement) => {
                let id = StatementId::new(format!("pending-{}", self.edits.len()));
                self.by_id.insert(id.clone(), self.edits.len());
                self.edits.push(StatementEdit::Create {
                    statement: statement.clone(),
                });
                snapshot.push(ExistingStatement::new(id, statement.clone()));
            }
            MergeDecision::Merge(plan) => {
                if let Some(slot) = snapshot.iter_mut().find(|e| e.id == plan.statement_id) {
                    slot.statement = plan.merged.clone();
                }
                // A statement touched twice on one page is written once
                match self.by_id.get(&plan.statement_id) {
                    Some(&index) => match &mut self.edits[index] {
                        StatementEdit::Create { statement } | StatementEdit::Replace { statement, .. } => {
                            *statement = plan.merged.clone();
                        }
                    },
                    None => {
                        self.by_id.insert(plan.statement_id.clone(), self.edits.len());
                        self.edits.push(StatementEdit::Replace {
                            id: plan.statement_id.clone(),
                            statement: plan.merged.clone(),
                        });
                    }
                }
            }
            MergeDecision::Skip(_) => {}
        }
    }
}

/// Turns one page's infobox into committed statements
#[derive(Debug)]
pub struct PageProcessor<'a> {
    ctx: Collaborators<'a>,
    lexicon: &'a Lexicon,
    config: &'a TransferConfig,
    engine: MergeEngine,
    retrieved: Option<WikiDate>,
}

impl<'a> PageProcessor<'a> {
    /// Create processor
    #[must_use]
    pub fn new(ctx: Collaborators<'a>, lexicon: &'a Lexicon, config: &'a TransferConfig) -> Self {
        Self {
            ctx,
            lexicon,
            config,
            engine: MergeEngine::new(Claim::entity(props::IMPORTED_FROM, config.project)),
            retrieved: None,
        }
    }

    /// Fix the retrieval date instead of using today
    #[inline]
    #[must_use]
    pub fn with_retrieved(mut self, date: WikiDate) -> Self {
        self.retrieved = Some(date);
        self
    }

    /// Process every page, collecting failures instead of stopping
    pub fn process_all<'p>(&self, pages: impl IntoIterator<Item = &'p WikiPage>) -> RunSummary {
        let mut summary = RunSummary::default();
        for page in pages {
            match self.process(page) {
                Ok(report) => summary.reports.push(report),
                Err(err) => summary.failures.push(PageFailure {
                    page: page.clone(),
                    error: err.to_string(),
                }),
            }
        }
        tracing::info!(
            processed = summary.reports.len(),
            failed = summary.failures.len(),
            written = summary.written(),
            "run finished"
        );
        summary
    }

    /// Process one page
    ///
    /// # Errors
    /// `PipelineError` when a record cannot be resolved, the page has no
    /// entity, or a write is refused. Nothing is committed in the first two
    /// cases.
    pub fn process(&self, page: &WikiPage) -> PipelineResult<PageReport> {
        tracing::info!(page = %page, "processing page");
        if self.config.is_ignored(&page.title) {
            tracing::info!(page = %page, "ignored page");
            return Ok(PageReport::new(page, PageStatus::Ignored));
        }

        let template = &self.config.template;
        let aliases = self.ctx.pages.template_aliases(template);
        let Some(fields) = self
            .ctx
            .pages
            .template_fields(page, template, &aliases)
            .filter(|fields| !fields.is_empty())
        else {
            tracing::warn!(page = %page, template = %template, "no infobox");
            return Ok(PageReport::new(page, PageStatus::NoInfobox));
        };

        let records = group_positions(&fields);
        if records.is_empty() {
            tracing::warn!(page = %page, "no position fields");
            return Ok(PageReport::new(page, PageStatus::NoPositions));
        }

        let sources = vec![self.sources()?];
        let resolver = RecordResolver::new(self.ctx, self.lexicon);
        let mut report = PageReport::new(page, PageStatus::UpToDate);
        let mut statements: Vec<Statement> = Vec::with_capacity(records.len());

        for record in &records {
            let resolved = resolver.resolve(record).map_err(|err| {
                tracing::error!(page = %page, index = record.index(), error = %err, "discarding page");
                PipelineError::record(&page.title, record.index(), err)
            })?;
            report.records.push(RecordReport {
                index: resolved.index.clone(),
                title: record.title().unwrap_or_default().to_string(),
                title_inherited: record.title_inherited(),
                office: resolved.position.office(),
                skipped: resolved.skipped.clone(),
                warnings: record.warnings().to_vec(),
            });
            statements.push(resolved.into_statement(sources.iter().cloned()));
        }

        let entity = self.ctx.entities.entity_for_page(page).ok_or_else(|| {
            tracing::error!(page = %page, "page has no entity");
            PipelineError::NoEntity(page.title.clone())
        })?;
        report.entity = Some(entity);

        let mut snapshot = self.ctx.properties.statements(entity, props::POSITION_HELD);
        let mut plan = EditPlan::default();
        for statement in &statements {
            let decision = self.engine.decide(statement, &snapshot);
            tracing::info!(page = %page, entity = %entity, decision = decision.kind(), "merge decision");
            plan.apply(&decision, &mut snapshot);
            report.decisions.push(decision);
        }
        report.edits = plan.edits;

        if report.edits.is_empty() {
            tracing::info!(page = %page, entity = %entity, "statements up to date");
        } else if self.config.dry_run {
            report.status = PageStatus::DryRun;
            tracing::info!(page = %page, edits = report.edits.len(), "dry run, nothing committed");
        } else {
            let receipt = self
                .ctx
                .committer
                .commit(entity, &report.edits, &self.config.edit_summary)
                .map_err(|err| {
                    tracing::error!(page = %page, entity = %entity, error = %err, "commit failed");
                    err
                })?;
            tracing::info!(page = %page, entity = %entity, applied = receipt.applied, "committed");
            report.status = PageStatus::Committed;
            report.receipt = Some(receipt);
        }

        if self.config.strip_source_fields && !self.config.dry_run {
            report.stripped = self.strip(page, &fields)?;
        }
        Ok(report)
    }

    fn strip(&self, page: &WikiPage, fields: &TemplateFieldSet) -> PipelineResult<bool> {
        let Some(text) = self.ctx.pages.page_text(page) else {
            tracing::warn!(page = %page, "no page text to strip");
            return Ok(false);
        };
        let stripped = strip_transferred_fields(&text, fields);
        if stripped == text {
            return Ok(false);
        }
        self.ctx
            .pages
            .save_text(page, &stripped, &self.config.strip_summary)?;
        tracing::info!(page = %page, "removed transferred fields");
        Ok(true)
    }

    /// "Imported from" the project, "retrieved" today
    fn sources(&self) -> PipelineResult<Source> {
        let retrieved = match self.retrieved {
            Some(date) => date,
            None => today()?,
        };
        Ok(Source::new(vec![
            Claim::entity(props::IMPORTED_FROM, self.config.project),
            Claim::time(props::RETRIEVED, retrieved),
        ]))
    }
}

fn today() -> Result<WikiDate, ModelError> {
    let now = chrono::Local::now().date_naive();
    let month = u8::try_from(now.month()).map_err(|e| ModelError::invalid_date(e.to_string()))?;
    let day = u8::try_from(now.day()).map_err(|e| ModelError::invalid_date(e.to_string()))?;
    WikiDate::ymd(now.year(), month, day)
}
