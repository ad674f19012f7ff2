//! Drain-and-attach processing of queued interaction records

use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::error::{Error, Result};
use crate::logging::{LogMetrics, Timer};
use crate::models::{
    Content, ContentId, Interaction, InteractionRecord, Platform, RawInteraction, User, UserId,
};
use crate::ranking::{
    reports, EngagementEntry, PlatformEngagementEntry, SortStrategy, WatchTimeEntry,
};
use crate::store::{ContentStore, IngestionQueue, StoreError, UserStore};

use super::{PlatformRegistry, ProcessingReport, ProcessingResult};

/// Aggregates interaction records into content and user indexes
///
/// Records are buffered by [`ingest`](Self::ingest) and only touch the
/// stores when [`process_queue`](Self::process_queue) drains them, in
/// arrival order.
#[derive(Debug, Default)]
pub struct AnalysisPipeline {
    queue: IngestionQueue<RawInteraction>,
    contents: ContentStore,
    users: UserStore,
    platforms: PlatformRegistry,
    sort_strategy: SortStrategy,
    skipped_total: usize,
}

impl AnalysisPipeline {
    /// Create an empty pipeline ranking with the given strategy
    pub fn new(sort_strategy: SortStrategy) -> Self {
        Self {
            sort_strategy,
            ..Self::default()
        }
    }

    /// Queue one record given as a field-name to value mapping
    pub fn ingest(&mut self, record: &HashMap<String, String>) {
        self.ingest_raw(RawInteraction::from_record(record));
    }

    /// Queue an already typed raw record
    pub fn ingest_raw(&mut self, raw: RawInteraction) {
        self.queue.enqueue(raw);
    }

    /// Drain the queue, attaching every valid record to its content and user
    ///
    /// Invalid records are logged and counted, never fatal. Only structural
    /// store failures abort the drain.
    pub fn process_queue(&mut self) -> Result<ProcessingReport> {
        let batch_id = Uuid::new_v4();
        let span = crate::pipeline_span!(batch_id);
        let _guard = span.enter();
        span.record("queued", self.queue.len());

        let timer = Timer::start("process_queue");
        let mut processed = 0usize;
        let mut skipped = 0usize;

        while let Some(raw) = self.queue.dequeue() {
            match self.process_record(raw)? {
                ProcessingResult::Attached => processed += 1,
                ProcessingResult::Skipped(errors) => {
                    warn!(
                        problems = errors.len(),
                        fields = ?errors.fields(),
                        "Skipping invalid record: {}",
                        errors
                    );
                    let reason = errors
                        .errors()
                        .first()
                        .map_or("unknown", |e| e.kind.as_str());
                    LogMetrics::counter("records_skipped", 1, &[("reason", reason)]);
                    skipped += 1;
                },
            }
        }

        self.skipped_total += skipped;
        let duration = timer.stop();
        span.record("processed", processed);
        span.record("skipped", skipped);

        info!(
            processed,
            skipped,
            contents = self.contents.len(),
            users = self.users.len(),
            duration_ms = duration.as_millis(),
            "Queue drained"
        );
        LogMetrics::gauge("content_store_size", self.contents.len() as f64, &[]);
        LogMetrics::gauge("user_store_size", self.users.len() as f64, &[]);

        Ok(ProcessingReport {
            batch_id,
            processed,
            skipped,
            duration,
        })
    }

    /// Validate one record and attach it
    fn process_record(&mut self, raw: RawInteraction) -> Result<ProcessingResult> {
        // Nothing is resolved until the whole record has been validated
        if let Err(errors) = raw.validate_fields() {
            return Ok(ProcessingResult::Skipped(errors));
        }
        let record = match InteractionRecord::try_from(raw) {
            Ok(record) => record,
            Err(e) => return Ok(ProcessingResult::Skipped(e.into())),
        };
        let platform = match self.platforms.resolve(&record.platform_name) {
            Ok(platform) => platform,
            Err(e) => return Ok(ProcessingResult::Skipped(e.into())),
        };

        let content_id = record.content_id;
        let user_id = record.user_id;
        self.resolve_content(content_id, &record.content_name)?;
        self.resolve_user(user_id)?;

        let interaction = Arc::new(Interaction::from_record(record, platform));
        self.contents
            .get_mut(&content_id)
            .ok_or_else(|| missing_entity("content", content_id))?
            .add_interaction(Arc::clone(&interaction));
        self.users
            .get_mut(&user_id)
            .ok_or_else(|| missing_entity("user", user_id))?
            .add_interaction(interaction);

        Ok(ProcessingResult::Attached)
    }

    fn resolve_content(&mut self, id: ContentId, name: &str) -> Result<()> {
        if !self.contents.contains_key(&id) {
            self.contents.insert(id, Content::new(id, name))?;
            debug!(content_id = id, name, "Created content");
        }
        Ok(())
    }

    fn resolve_user(&mut self, id: UserId) -> Result<()> {
        if !self.users.contains_key(&id) {
            self.users.insert(id, User::new(id))?;
            debug!(user_id = id, "Created user");
        }
        Ok(())
    }

    /// Users ranked by total watched seconds, highest first
    pub fn rank_users_by_watch_time(&self, top_n: Option<usize>) -> Vec<WatchTimeEntry<'_, User>> {
        let timer = Timer::start("rank_users_by_watch_time");
        let ranked = reports::users_by_watch_time(&self.users, self.sort_strategy, top_n);
        timer.stop();
        ranked
    }

    /// Content ranked by total watched seconds, highest first
    pub fn rank_content_by_watch_time(
        &self,
        top_n: Option<usize>,
    ) -> Vec<WatchTimeEntry<'_, Content>> {
        let timer = Timer::start("rank_content_by_watch_time");
        let ranked = reports::content_by_watch_time(&self.contents, self.sort_strategy, top_n);
        timer.stop();
        ranked
    }

    /// Content ranked by likes + shares + comments, highest first
    pub fn rank_content_by_engagement(&self, top_n: Option<usize>) -> Vec<EngagementEntry<'_>> {
        let timer = Timer::start("rank_content_by_engagement");
        let ranked = reports::content_by_engagement(&self.contents, self.sort_strategy, top_n);
        timer.stop();
        ranked
    }

    /// Platforms ranked by engagement over all content, highest first
    pub fn rank_platforms_by_engagement(
        &self,
        top_n: Option<usize>,
    ) -> Vec<PlatformEngagementEntry> {
        let timer = Timer::start("rank_platforms_by_engagement");
        let ranked = reports::platforms_by_engagement(&self.contents, self.sort_strategy, top_n);
        timer.stop();
        ranked
    }

    /// Comment texts left on a content item, in arrival order
    ///
    /// Unknown content yields an empty list.
    pub fn comments_for_content(&self, content_id: ContentId) -> Vec<&str> {
        self.contents
            .get(&content_id)
            .map(Content::comments)
            .unwrap_or_default()
    }

    /// Drop a content entry; absent ids are a no-op
    ///
    /// Interactions stay attached to their users.
    pub fn remove_content(&mut self, content_id: ContentId) -> Option<Content> {
        let removed = self.contents.remove(&content_id);
        if removed.is_some() {
            info!(content_id, "Removed content");
        }
        removed
    }

    /// Drop a user entry; absent ids are a no-op
    pub fn remove_user(&mut self, user_id: UserId) -> Option<User> {
        let removed = self.users.remove(&user_id);
        if removed.is_some() {
            info!(user_id, "Removed user");
        }
        removed
    }

    pub fn contents(&self) -> &ContentStore {
        &self.contents
    }

    pub fn users(&self) -> &UserStore {
        &self.users
    }

    /// Known platforms ordered by name
    pub fn platforms(&self) -> Vec<Arc<Platform>> {
        self.platforms.platforms()
    }

    pub fn sort_strategy(&self) -> SortStrategy {
        self.sort_strategy
    }

    /// Records skipped across every drain so far
    pub fn skipped_records(&self) -> usize {
        self.skipped_total
    }

    /// Records waiting to be processed
    pub fn queued(&self) -> usize {
        self.queue.len()
    }
}

fn missing_entity(entity: &str, id: i64) -> Error {
    Error::from(StoreError::Corrupted(format!(
        "{} {} missing right after resolution",
        entity, id
    )))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ValidationErrorKind;
    use crate::test_utils::RecordBuilder;

    fn pipeline_with(records: Vec<HashMap<String, String>>) -> AnalysisPipeline {
        let mut pipeline = AnalysisPipeline::new(SortStrategy::Quick);
        for record in &records {
            pipeline.ingest(record);
        }
        pipeline
    }

    #[test]
    fn test_watch_time_aggregates_across_users() {
        let mut pipeline = pipeline_with(vec![
            RecordBuilder::new(1, 10).name("A").kind("like").watch("30").build(),
            RecordBuilder::new(1, 11).name("A").kind("view_start").watch("120").build(),
        ]);
        assert_eq!(pipeline.queued(), 2);

        let report = pipeline.process_queue().unwrap();
        assert_eq!(report.processed, 2);
        assert_eq!(report.skipped, 0);
        assert_eq!(pipeline.queued(), 0);

        let ranked = pipeline.rank_content_by_watch_time(None);
        assert_eq!(ranked.len(), 1);
        assert_eq!(ranked[0].entity.id(), 1);
        assert_eq!(ranked[0].entity.name(), "A");
        assert_eq!(ranked[0].total_seconds, 150);
        assert_eq!(pipeline.contents().len(), 1);
        assert_eq!(pipeline.users().len(), 2);
    }

    #[test]
    fn test_invalid_record_creates_no_entities() {
        let mut pipeline = pipeline_with(vec![
            RecordBuilder::new(1, 10).build(),
            RecordBuilder::new(2, 20).kind("bogus").build(),
            RecordBuilder::new(1, 11).build(),
        ]);

        let report = pipeline.process_queue().unwrap();
        assert_eq!(report.processed, 2);
        assert_eq!(report.skipped, 1);
        assert_eq!(pipeline.skipped_records(), 1);
        assert_eq!(pipeline.queued(), 0);
        assert!(!pipeline.contents().contains_key(&2));
        assert!(!pipeline.users().contains_key(&20));
    }

    #[test]
    fn test_skipped_record_reports_every_problem() {
        let mut pipeline = AnalysisPipeline::default();
        let raw = RawInteraction::from_record(
            &RecordBuilder::new(1, 1)
                .kind("bogus")
                .field("id_usuario", "ten")
                .timestamp("soon")
                .build(),
        );

        match pipeline.process_record(raw).unwrap() {
            ProcessingResult::Skipped(errors) => {
                assert_eq!(errors.len(), 3);
                assert!(errors.contains_kind(&ValidationErrorKind::InvalidInteractionKind));
                assert!(errors.contains_kind(&ValidationErrorKind::InvalidInteger));
                assert!(errors.contains_kind(&ValidationErrorKind::InvalidTimestamp));
                assert!(errors.fields().contains(&"id_usuario"));
            },
            ProcessingResult::Attached => panic!("invalid record was attached"),
        }
        assert!(pipeline.contents().is_empty());
    }

    #[test]
    fn test_skipped_total_accumulates_over_drains() {
        let mut pipeline = pipeline_with(vec![RecordBuilder::new(1, 1).kind("nope").build()]);
        pipeline.process_queue().unwrap();
        pipeline.ingest(&RecordBuilder::new(1, 1).watch("abc").build());
        pipeline.process_queue().unwrap();
        assert_eq!(pipeline.skipped_records(), 2);
        assert!(pipeline.contents().is_empty());
    }

    #[test]
    fn test_interaction_shared_between_content_and_user() {
        let mut pipeline = pipeline_with(vec![RecordBuilder::new(5, 50).build()]);
        pipeline.process_queue().unwrap();

        let content = pipeline.contents().get(&5).unwrap();
        let user = pipeline.users().get(&50).unwrap();
        assert!(Arc::ptr_eq(&content.interactions()[0], &user.interactions()[0]));
    }

    #[test]
    fn test_first_name_wins_for_existing_content() {
        let mut pipeline = pipeline_with(vec![
            RecordBuilder::new(1, 1).name("First").build(),
            RecordBuilder::new(1, 2).name("Renamed").build(),
        ]);
        pipeline.process_queue().unwrap();
        assert_eq!(pipeline.contents().get(&1).unwrap().name(), "First");
        assert_eq!(pipeline.contents().get(&1).unwrap().interactions().len(), 2);
    }

    #[test]
    fn test_top_n_truncation() {
        let mut pipeline = pipeline_with(vec![
            RecordBuilder::new(1, 1).watch("10").build(),
            RecordBuilder::new(2, 2).watch("30").build(),
            RecordBuilder::new(3, 3).watch("20").build(),
        ]);
        pipeline.process_queue().unwrap();

        let top = pipeline.rank_users_by_watch_time(Some(1));
        assert_eq!(top.len(), 1);
        assert_eq!(top[0].entity.id(), 2);
        assert_eq!(top[0].total_seconds, 30);
    }

    #[test]
    fn test_engagement_ranking() {
        let mut pipeline = pipeline_with(vec![
            RecordBuilder::new(1, 1).kind("like").build(),
            RecordBuilder::new(2, 1).kind("share").build(),
            RecordBuilder::new(2, 2).kind("comment").comment("nice").build(),
            RecordBuilder::new(2, 3).kind("view_start").build(),
        ]);
        pipeline.process_queue().unwrap();

        let ranked = pipeline.rank_content_by_engagement(None);
        assert_eq!(ranked[0].content.id(), 2);
        assert_eq!(
            (ranked[0].likes, ranked[0].shares, ranked[0].comments, ranked[0].total),
            (0, 1, 1, 2)
        );
        assert_eq!(ranked[1].total, 1);
    }

    #[test]
    fn test_platform_ranking() {
        let mut pipeline = pipeline_with(vec![
            RecordBuilder::new(1, 1).platform("TikTok").kind("like").build(),
            RecordBuilder::new(1, 2).platform("TikTok").kind("share").build(),
            RecordBuilder::new(2, 1).platform("YouTube").kind("like").build(),
        ]);
        pipeline.process_queue().unwrap();

        let ranked = pipeline.rank_platforms_by_engagement(None);
        assert_eq!(ranked.len(), 2);
        assert_eq!(ranked[0].platform.name(), "TikTok");
        assert_eq!(ranked[0].engagement, 2);
        assert_eq!(pipeline.platforms().len(), 2);
    }

    #[test]
    fn test_comments_for_content() {
        let mut pipeline = pipeline_with(vec![
            RecordBuilder::new(7, 1).kind("comment").comment("  first ").build(),
            RecordBuilder::new(7, 2).kind("like").comment("ignored").build(),
            RecordBuilder::new(7, 3).kind("comment").comment("second").build(),
        ]);
        pipeline.process_queue().unwrap();

        assert_eq!(pipeline.comments_for_content(7), vec!["first", "second"]);
        assert!(pipeline.comments_for_content(99).is_empty());
    }

    #[test]
    fn test_remove_entities() {
        let mut pipeline = pipeline_with(vec![RecordBuilder::new(1, 1).build()]);
        pipeline.process_queue().unwrap();

        assert!(pipeline.remove_content(1).is_some());
        assert!(pipeline.remove_content(1).is_none());
        assert!(pipeline.remove_user(42).is_none());
        assert_eq!(pipeline.users().get(&1).unwrap().interactions().len(), 1);
        assert!(pipeline.rank_content_by_watch_time(None).is_empty());
    }

    #[test]
    fn test_empty_queue() {
        let mut pipeline = AnalysisPipeline::new(SortStrategy::Merge);
        let report = pipeline.process_queue().unwrap();
        assert_eq!(report.drained(), 0);
        assert_eq!(pipeline.sort_strategy(), SortStrategy::Merge);
    }
}
