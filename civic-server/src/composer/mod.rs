//! Report Composer
//!
//! Collects description, optional image and location for one report, runs
//! the location state machine ([`LocationState`]) and turns the result into
//! an [`IssueRecord`].
//!
//! # 流程
//!
//! ```text
//! new() / edit(record)
//!   → set_description / set_image / set_address / detect_location
//!   → validate()
//!   → compose(classifier)  (classification or fallback, never fails on AI errors)
//!   → RecordStore::upsert
//! ```

pub mod location;

pub use location::{
    ClientReportedPosition, LocationState, PositionError, PositionOptions, PositionProvider,
};

use shared::models::{
    Address, Classification, IssueRecord, IssueStatus, IssueSubmission, Location, LocationMode,
    MIN_DESCRIPTION_LEN,
};
use shared::util::{now_millis, short_id};

use crate::services::{Classifier, Geocoder, InlineImage, classify_or_fallback};
use crate::store::{RecordStore, UpsertOutcome};
use crate::utils::{AppError, AppResult, ErrorCode};

/// Draft of a new or edited report
#[derive(Debug, Clone, Default)]
pub struct ReportComposer {
    description: String,
    image: Option<String>,
    mode: LocationMode,
    address: Address,
    state: LocationState,
    /// Last device coordinates obtained (kept even if the address lookup failed)
    last_fix: Option<Location>,
    /// Record being edited
    editing: Option<IssueRecord>,
}

impl ReportComposer {
    /// Blank draft: auto mode, idle
    pub fn new() -> Self {
        Self::default()
    }

    /// Draft prefilled from an existing record: manual mode, captured
    pub fn edit(record: IssueRecord) -> Self {
        Self {
            description: record.description.clone(),
            image: record.image.clone(),
            mode: LocationMode::Manual,
            address: record.address.clone(),
            state: LocationState::Captured {
                location: record.location,
            },
            last_fix: Some(record.location),
            editing: Some(record),
        }
    }

    /// Apply a create / edit payload
    ///
    /// A location in the payload counts as a captured fix.
    pub fn apply_submission(&mut self, submission: IssueSubmission) -> AppResult<()> {
        self.description = submission.description;
        self.image = submission.image.filter(|i| !i.trim().is_empty());
        self.mode = submission.location_mode;
        self.address = submission.address;

        if let Some(location) = submission.location {
            if !location.is_valid() {
                return Err(AppError::new(ErrorCode::InvalidCoordinates)
                    .with_detail("lat", location.lat)
                    .with_detail("lng", location.lng));
            }
            self.last_fix = Some(location);
            self.state = LocationState::Captured { location };
        }
        Ok(())
    }

    // ========== Accessors ==========

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn mode(&self) -> LocationMode {
        self.mode
    }

    pub fn address(&self) -> &Address {
        &self.address
    }

    pub fn state(&self) -> &LocationState {
        &self.state
    }

    pub fn last_fix(&self) -> Option<Location> {
        self.last_fix
    }

    pub fn is_editing(&self) -> bool {
        self.editing.is_some()
    }

    pub fn set_description(&mut self, description: impl Into<String>) {
        self.description = description.into();
    }

    pub fn set_image(&mut self, image: Option<String>) {
        self.image = image;
    }

    pub fn set_mode(&mut self, mode: LocationMode) {
        self.mode = mode;
    }

    pub fn set_address(&mut self, address: Address) {
        self.address = address;
    }

    // ========== Location state machine ==========

    /// idle / captured / failed → locating
    pub fn start_locating(&mut self) -> AppResult<()> {
        if self.state.is_locating() {
            return Err(AppError::new(ErrorCode::LocationInProgress));
        }
        self.mode = LocationMode::Auto;
        self.state = LocationState::Locating;
        Ok(())
    }

    /// locating → captured | failed
    ///
    /// With no geocoder a fix goes straight to captured and the address is
    /// left untouched. A geocode failure keeps the coordinates.
    pub async fn complete_locating(
        &mut self,
        fix: Result<Location, PositionError>,
        geocoder: Option<&dyn Geocoder>,
    ) -> &LocationState {
        let location = match fix {
            Ok(location) => location,
            Err(e) => {
                tracing::info!(reason = e.message(), "Location detection failed");
                self.state = LocationState::failed(e.code(), None);
                return &self.state;
            }
        };
        self.last_fix = Some(location);

        let Some(geocoder) = geocoder else {
            self.state = LocationState::Captured { location };
            return &self.state;
        };

        self.state = match geocoder.reverse(location).await {
            Ok(address) => {
                self.address = address;
                LocationState::Captured { location }
            }
            Err(e) => {
                tracing::warn!(error = %e, lat = location.lat, lng = location.lng, "Reverse geocoding failed");
                LocationState::failed(ErrorCode::GeocodeFailed, Some(location))
            }
        };
        &self.state
    }

    /// Full detect cycle: ask the provider (bounded by `options.timeout`),
    /// then reverse geocode
    pub async fn detect_location(
        &mut self,
        provider: Option<&dyn PositionProvider>,
        geocoder: Option<&dyn Geocoder>,
        options: PositionOptions,
    ) -> AppResult<&LocationState> {
        self.start_locating()?;

        let fix = match provider {
            None => Err(PositionError::Unsupported),
            Some(provider) => {
                match tokio::time::timeout(options.timeout, provider.current_position(options))
                    .await
                {
                    Ok(result) => result,
                    Err(_) => Err(PositionError::Timeout),
                }
            }
        };

        Ok(self.complete_locating(fix, geocoder).await)
    }

    // ========== Submission ==========

    /// Check submission preconditions (nothing is stored on failure)
    ///
    /// Returns the validated inline image, if any.
    pub fn validate(&self, max_image_bytes: usize) -> AppResult<Option<InlineImage>> {
        if self.state.is_locating() {
            return Err(AppError::new(ErrorCode::LocationInProgress));
        }

        let length = self.description.trim().chars().count();
        if length <= MIN_DESCRIPTION_LEN {
            return Err(AppError::new(ErrorCode::DescriptionTooShort)
                .with_detail("length", length)
                .with_detail("min", MIN_DESCRIPTION_LEN + 1));
        }

        let missing = self.address.missing_fields();
        if !missing.is_empty() {
            return Err(AppError::new(ErrorCode::AddressIncomplete).with_detail("missing", missing));
        }

        self.image
            .as_deref()
            .map(|payload| InlineImage::parse(payload, max_image_bytes))
            .transpose()
    }

    pub fn can_submit(&self, max_image_bytes: usize) -> bool {
        self.validate(max_image_bytes).is_ok()
    }

    /// Build the record to store
    ///
    /// An edit with an unchanged description reuses the stored classification
    /// without calling the service.
    pub async fn compose(
        &self,
        classifier: &dyn Classifier,
        max_image_bytes: usize,
    ) -> AppResult<IssueRecord> {
        let image = self.validate(max_image_bytes)?;
        let description = self.description.trim().to_string();

        let reused = self
            .editing
            .as_ref()
            .filter(|prev| prev.description.trim() == description)
            .map(IssueRecord::classification);

        let classification: Classification = match reused {
            Some(classification) => {
                tracing::debug!("Description unchanged, reusing classification");
                classification
            }
            None => classify_or_fallback(classifier, &description, image.as_ref()).await,
        };

        let (id, timestamp, status) = match &self.editing {
            Some(prev) => (prev.id.clone(), prev.timestamp, prev.status),
            None => (short_id(), now_millis(), IssueStatus::Pending),
        };

        let mut record = IssueRecord {
            id,
            description,
            image: self.image.clone(),
            priority: classification.priority,
            ai_summary: String::new(),
            ai_reason: String::new(),
            priority_score: 0,
            location: self.last_fix.unwrap_or_default(),
            address: trimmed(&self.address),
            timestamp,
            status,
        };
        record.apply_classification(classification);
        Ok(record)
    }

    /// Compose and save: new reports are inserted, edits replace in place
    pub async fn submit(
        &self,
        classifier: &dyn Classifier,
        store: &mut RecordStore,
        max_image_bytes: usize,
    ) -> AppResult<(IssueRecord, UpsertOutcome)> {
        let record = self.compose(classifier, max_image_bytes).await?;
        if self.is_editing() {
            let outcome = store.upsert(record.clone())?;
            Ok((record, outcome))
        } else {
            let record = store.create(record)?;
            Ok((record, UpsertOutcome::Created))
        }
    }
}

fn trimmed(address: &Address) -> Address {
    Address {
        city: address.city.trim().to_string(),
        state: address.state.trim().to_string(),
        district: address.district.trim().to_string(),
        postal_code: address.postal_code.trim().to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::{ClassifyError, GeocodeError};
    use async_trait::async_trait;
    use shared::models::Priority;
    use std::sync::atomic::{AtomicUsize, Ordering};

    const MAX: usize = 1024;

    struct FixedClassifier {
        calls: AtomicUsize,
    }

    impl FixedClassifier {
        fn new() -> Self {
            Self {
                calls: AtomicUsize::new(0),
            }
        }
    }

    #[async_trait]
    impl Classifier for FixedClassifier {
        async fn classify(
            &self,
            _description: &str,
            _image: Option<&InlineImage>,
        ) -> Result<Classification, ClassifyError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(Classification {
                priority: Priority::High,
                summary: "Gas leak".into(),
                reason: "Life threat".into(),
                score: 90,
            })
        }
    }

    struct FailingClassifier;

    #[async_trait]
    impl Classifier for FailingClassifier {
        async fn classify(
            &self,
            _description: &str,
            _image: Option<&InlineImage>,
        ) -> Result<Classification, ClassifyError> {
            Err(ClassifyError::InvalidResponse("boom".into()))
        }
    }

    struct StubGeocoder(Option<Address>);

    #[async_trait]
    impl Geocoder for StubGeocoder {
        async fn reverse(&self, _location: Location) -> Result<Address, GeocodeError> {
            self.0.clone().ok_or(GeocodeError::NoResults)
        }
    }

    struct SlowProvider;

    #[async_trait]
    impl PositionProvider for SlowProvider {
        async fn current_position(&self, _options: PositionOptions) -> Result<Location, PositionError> {
            tokio::time::sleep(std::time::Duration::from_secs(60)).await;
            Ok(Location::default())
        }
    }

    fn springfield() -> Address {
        Address {
            city: "Springfield".into(),
            state: "IL".into(),
            district: String::new(),
            postal_code: "62701".into(),
        }
    }

    fn ready_composer(description: &str) -> ReportComposer {
        let mut composer = ReportComposer::new();
        composer.set_description(description);
        composer.set_address(springfield());
        composer
    }

    #[test]
    fn short_description_is_rejected() {
        let composer = ready_composer("Hole!");
        let err = composer.validate(MAX).unwrap_err();
        assert_eq!(err.code, ErrorCode::DescriptionTooShort);
        assert!(ready_composer("Hole!!").can_submit(MAX));
    }

    #[test]
    fn incomplete_address_is_rejected() {
        let mut composer = ready_composer("Pothole on Main St");
        composer.set_address(Address {
            city: "Springfield".into(),
            ..Default::default()
        });
        let err = composer.validate(MAX).unwrap_err();
        assert_eq!(err.code, ErrorCode::AddressIncomplete);
    }

    #[test]
    fn locating_blocks_submission() {
        let mut composer = ready_composer("Pothole on Main St");
        composer.start_locating().unwrap();
        assert_eq!(
            composer.validate(MAX).unwrap_err().code,
            ErrorCode::LocationInProgress
        );
        assert_eq!(
            composer.start_locating().unwrap_err().code,
            ErrorCode::LocationInProgress
        );
    }

    #[tokio::test]
    async fn failing_classifier_yields_fallback() {
        let record = ready_composer("Pothole on Main St")
            .compose(&FailingClassifier, MAX)
            .await
            .unwrap();
        assert_eq!(record.priority, Priority::Low);
        assert_eq!(record.priority_score, 0);
        assert_eq!(record.ai_summary, "Manual Review Required");
        assert_eq!(record.status, IssueStatus::Pending);
        assert_eq!(record.location, Location::default());
        assert_eq!(record.id.len(), 9);
    }

    #[tokio::test]
    async fn edit_with_same_description_reuses_classification() {
        let classifier = FixedClassifier::new();
        let original = ready_composer("Gas smell near school")
            .compose(&classifier, MAX)
            .await
            .unwrap();
        assert_eq!(classifier.calls.load(Ordering::SeqCst), 1);

        let mut editor = ReportComposer::edit(original.clone());
        assert_eq!(editor.mode(), LocationMode::Manual);
        assert_eq!(
            editor.state(),
            &LocationState::Captured {
                location: original.location
            }
        );
        let mut address = springfield();
        address.district = "Sangamon".into();
        editor.set_address(address);

        let edited = editor.compose(&FailingClassifier, MAX).await.unwrap();
        assert_eq!(edited.classification(), original.classification());
        assert_eq!(edited.id, original.id);
        assert_eq!(edited.timestamp, original.timestamp);
        assert_eq!(edited.address.district, "Sangamon");

        editor.set_description("Gas smell near the school gate");
        editor.compose(&classifier, MAX).await.unwrap();
        assert_eq!(classifier.calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn fix_then_geocode_fills_address() {
        let mut composer = ReportComposer::new();
        let geocoder = StubGeocoder(Some(springfield()));
        composer.start_locating().unwrap();
        let state = composer
            .complete_locating(Ok(Location::new(39.78, -89.65)), Some(&geocoder as &dyn Geocoder))
            .await
            .clone();
        assert_eq!(
            state,
            LocationState::Captured {
                location: Location::new(39.78, -89.65)
            }
        );
        assert_eq!(composer.address(), &springfield());
    }

    #[tokio::test]
    async fn geocode_failure_keeps_coordinates() {
        let mut composer = ReportComposer::new();
        composer.start_locating().unwrap();
        composer
            .complete_locating(Ok(Location::new(1.0, 2.0)), Some(&StubGeocoder(None) as &dyn Geocoder))
            .await;
        match composer.state() {
            LocationState::Failed { reason, code, location } => {
                assert_eq!(reason, "Address lookup failed. Please use manual entry.");
                assert_eq!(*code, ErrorCode::GeocodeFailed);
                assert_eq!(*location, Some(Location::new(1.0, 2.0)));
            }
            other => panic!("unexpected state {other:?}"),
        }
        assert_eq!(composer.last_fix(), Some(Location::new(1.0, 2.0)));

        // failed → locating on retry
        composer.start_locating().unwrap();
        assert!(composer.state().is_locating());
    }

    #[tokio::test]
    async fn no_geocoder_captures_without_address() {
        let mut composer = ReportComposer::new();
        composer.start_locating().unwrap();
        composer.complete_locating(Ok(Location::new(1.0, 2.0)), None).await;
        assert!(matches!(composer.state(), LocationState::Captured { .. }));
        assert_eq!(composer.address(), &Address::default());
    }

    #[tokio::test]
    async fn no_provider_is_unsupported() {
        let mut composer = ReportComposer::new();
        let state = composer
            .detect_location(None, None, PositionOptions::default())
            .await
            .unwrap()
            .clone();
        assert_eq!(state, LocationState::failed(ErrorCode::LocationUnsupported, None));
    }

    #[tokio::test(start_paused = true)]
    async fn slow_provider_times_out() {
        let mut composer = ReportComposer::new();
        let state = composer
            .detect_location(Some(&SlowProvider as &dyn PositionProvider), None, PositionOptions::default())
            .await
            .unwrap()
            .clone();
        assert_eq!(state, LocationState::failed(ErrorCode::LocationTimeout, None));
    }
}
