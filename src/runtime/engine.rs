use std::sync::Arc;
use std::time::{Duration, Instant};
use crate::analysis::Analyzer;
use crate::analysis::config::AnalyzerConfig;
use crate::compiler::synthesizer::{LayoutConfig, Synthesizer};
use crate::dsl::WorkflowRequest;
use crate::error::{GenerationFailure, RequestError};
use crate::generative::GenerativeClient;
use crate::generative::payload::parse_payload;
use crate::generative::prompt::{SYSTEM_PROMPT, build_prompt};
use crate::runtime::ids::{IdGenerator, UuidGenerator};
use crate::runtime::package::{CredentialRequirement, GeneratedPackage, derive_setup_steps};
use crate::runtime::storage::PackageCache;
use tokio::time::timeout;
use tracing::{debug, info, warn};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineSettings {
    pub generation_timeout: Duration,
    pub cache_ttl: Duration,
    pub cache_prefix: String,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            generation_timeout: Duration::from_secs(30),
            cache_ttl: Duration::from_secs(3600),
            cache_prefix: "flowsmith:package".to_string(),
        }
    }
}

/// Where a returned package came from.
#[derive(Debug)]
pub enum PackageSource {
    Cache,
    Generated,
    Fallback(GenerationFailure),
}

impl PackageSource {
    pub fn is_fallback(&self) -> bool {
        matches!(self, PackageSource::Fallback(_))
    }
}

#[derive(Debug)]
pub struct GenerationOutcome {
    pub package: GeneratedPackage,
    pub source: PackageSource,
}

enum Phase {
    CacheLookup,
    Generate,
    Fallback(GenerationFailure),
    Done(GeneratedPackage, PackageSource),
}

/// Completion orchestrator.
///
/// `CacheLookup -> (hit) return | (miss) Generate -> (ok) Done | (fail) Fallback -> Done`.
/// The generative call is the only suspension point that can be cut short,
/// and a failure there always ends in the deterministic fallback.
pub struct Engine {
    cache: Arc<dyn PackageCache>,
    generator: Arc<dyn GenerativeClient>,
    ids: Arc<dyn IdGenerator>,
    synthesizer: Synthesizer,
    analyzer: Analyzer,
    settings: EngineSettings,
}

impl Engine {
    pub fn new(cache: Arc<dyn PackageCache>, generator: Arc<dyn GenerativeClient>) -> Self {
        let analyzer = AnalyzerConfig::default();
        Self {
            cache,
            generator,
            ids: Arc::new(UuidGenerator),
            synthesizer: Synthesizer::new(LayoutConfig::default(), analyzer.transform_vocabulary.clone()),
            analyzer: Analyzer::new(analyzer),
            settings: EngineSettings::default(),
        }
    }

    pub fn with_ids(mut self, ids: Arc<dyn IdGenerator>) -> Self {
        self.ids = ids;
        self
    }

    pub fn with_settings(mut self, settings: EngineSettings) -> Self {
        self.settings = settings;
        self
    }

    pub fn with_tuning(mut self, analyzer: AnalyzerConfig, layout: LayoutConfig) -> Self {
        self.synthesizer = Synthesizer::new(layout, analyzer.transform_vocabulary.clone());
        self.analyzer = Analyzer::new(analyzer);
        self
    }

    pub fn settings(&self) -> &EngineSettings {
        &self.settings
    }

    /// Produces a package for `request`, scoped to `namespace` in the cache.
    ///
    /// The only error is an input contract violation. A valid request always
    /// yields a package.
    pub async fn generate(
        &self,
        namespace: &str,
        request: &WorkflowRequest,
    ) -> Result<GenerationOutcome, RequestError> {
        let request = request.normalized();
        request.validate()?;

        let key = request.cache_key(&self.settings.cache_prefix, namespace);
        let started = Instant::now();
        let mut phase = Phase::CacheLookup;

        loop {
            phase = match phase {
                Phase::CacheLookup => match self.cache.get(&key).await {
                    Ok(Some(package)) => {
                        info!(cache_key = %key, package_id = %package.id, "Cache hit");
                        return Ok(GenerationOutcome {
                            package,
                            source: PackageSource::Cache,
                        });
                    }
                    Ok(None) => {
                        debug!(cache_key = %key, "Cache miss");
                        Phase::Generate
                    }
                    Err(e) => {
                        warn!(cache_key = %key, error = ?e, "Cache read failed");
                        Phase::Generate
                    }
                },
                Phase::Generate => match self.try_generate(&request, started).await {
                    Ok(package) => Phase::Done(package, PackageSource::Generated),
                    Err(failure) => {
                        warn!(workflow = %request.name, reason = %failure, "Generative path failed, using fallback");
                        Phase::Fallback(failure)
                    }
                },
                Phase::Fallback(failure) => {
                    let mut package = self.fallback_package(&request);
                    package.processing_time_ms = started.elapsed().as_millis() as u64;
                    Phase::Done(package, PackageSource::Fallback(failure))
                }
                Phase::Done(package, source) => {
                    if let Err(e) = self.cache.put(&key, &package, self.settings.cache_ttl).await {
                        warn!(cache_key = %key, error = ?e, "Cache write failed");
                    }
                    info!(
                        package_id = %package.id,
                        nodes = package.analysis.node_count,
                        fallback = source.is_fallback(),
                        "Package ready"
                    );
                    return Ok(GenerationOutcome { package, source });
                }
            };
        }
    }

    async fn try_generate(
        &self,
        request: &WorkflowRequest,
        started: Instant,
    ) -> Result<GeneratedPackage, GenerationFailure> {
        let prompt = build_prompt(request);
        let limit = self.settings.generation_timeout;

        let completion = match timeout(limit, self.generator.complete(SYSTEM_PROMPT, &prompt)).await {
            Ok(Ok(completion)) => completion,
            Ok(Err(e)) => return Err(GenerationFailure::Service(format!("{:#}", e))),
            Err(_) => return Err(GenerationFailure::Timeout(limit)),
        };

        let parsed = parse_payload(&completion.text)?;
        let credential_requirements = parsed
            .credential_requirements
            .unwrap_or_else(|| CredentialRequirement::derive(&parsed.graph));

        Ok(GeneratedPackage {
            id: self.ids.next_id(),
            name: request.name.clone(),
            graph: parsed.graph,
            analysis: parsed.analysis,
            setup_steps: parsed.setup_steps,
            credential_requirements,
            tokens_used: completion.tokens_used,
            processing_time_ms: started.elapsed().as_millis() as u64,
        })
    }

    /// Synthesizes and analyzes a package without touching the cache or the
    /// generative service. `request` must already satisfy
    /// [`WorkflowRequest::validate`].
    pub fn fallback_package(&self, request: &WorkflowRequest) -> GeneratedPackage {
        let graph = self.synthesizer.synthesize(request, self.ids.as_ref());
        let analysis = self.analyzer.analyze(&graph, request);
        let credential_requirements = CredentialRequirement::derive(&graph);
        let setup_steps = derive_setup_steps(&graph, request, &credential_requirements);

        GeneratedPackage {
            id: self.ids.next_id(),
            name: request.name.clone(),
            graph,
            analysis,
            setup_steps,
            credential_requirements,
            tokens_used: 0,
            processing_time_ms: 0,
        }
    }
}
