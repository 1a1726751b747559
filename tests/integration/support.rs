//! Test fakes: a scripted text generator and a switchable world generator.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use serde_json::json;

use worldforge::models::world::{GeneratedWorld, GenerationMetadata, WorldConfiguration};
use worldforge::services::world::{
    GeneratorError, SqliteWorldRepository, WorldCreationTrigger, WorldDefaults, WorldGenerator,
};
use worldforge::services::world_interview::{InterviewRepository, SqliteInterviewRepository};
use worldforge::storage::database::Database;
use worldforge::{InterviewReply, InterviewService};
use worldforge_llm::{LlmError, LlmResult, TextGenerator};

/// Answers for every topic except the last (World Name)
pub const ANSWERS: [&str; 21] = [
    "High fantasy with ancient ruins",
    "Hopeful but weary",
    "Magic drawn from starlight, paid for in memories",
    "Two moons drifting toward collision",
    "Discovery",
    "Medieval",
    "Wind, water, and starlight crystals",
    "Horses, riverboats, and sky barges",
    "Messenger birds and signal towers",
    "Medium",
    "Temperate with varied seasons",
    "Three continents around an inland sea",
    "Two great oceans full of leviathans",
    "The Shattered Spire",
    "Iron, timber, and starlight crystals",
    "Humans, Elves",
    "Kingdoms and free cities",
    "Feudal monarchies with elected councils",
    "The Lunar Choir worships the moons",
    "Trade in crystals and grain",
    "A war three centuries ago broke the old empire",
];

pub fn extraction_json(name: &str) -> String {
    json!({
        "world_name": name,
        "theme": "High fantasy",
        "tone": "Hopeful but weary",
        "magic_system": "Starlight magic paid for in memories",
        "central_conflict": "Two moons drifting toward collision",
        "story_branch": "Discovery",
        "tech_level": "medieval",
        "power_sources": "Wind, water, starlight crystals",
        "transportation": "Horses and sky barges",
        "communication": "Messenger birds",
        "planet_size": "medium",
        "climate": "Temperate with varied seasons",
        "landmasses": "Three continents",
        "oceans": "Two great oceans",
        "landmarks": "The Shattered Spire",
        "natural_resources": "Iron, timber, crystals",
        "sentient_species": ["Humans", "Elves"],
        "societies": "Kingdoms and free cities",
        "government": "Feudal monarchies",
        "religion": "The Lunar Choir",
        "economy": "Crystal trade",
        "history": "The fall of the old empire"
    })
    .to_string()
}

/// Answers prompts by recognizing which kind of prompt it is.
pub struct ScriptedClient {
    pub extraction_response: Mutex<String>,
    pub suggestion_response: Mutex<LlmResult<String>>,
    pub fail: AtomicBool,
    pub calls: AtomicUsize,
    pub prompts: Mutex<Vec<String>>,
}

impl ScriptedClient {
    pub fn new() -> Self {
        Self {
            extraction_response: Mutex::new(extraction_json("Aethoria")),
            suggestion_response: Mutex::new(Ok(
                "Shared Realm\nCommon Ground\nTwin Skies".to_string()
            )),
            fail: AtomicBool::new(false),
            calls: AtomicUsize::new(0),
            prompts: Mutex::new(Vec::new()),
        }
    }

    pub fn set_extraction(&self, response: impl Into<String>) {
        *self.extraction_response.lock().unwrap() = response.into();
    }

    pub fn set_suggestions(&self, response: LlmResult<String>) {
        *self.suggestion_response.lock().unwrap() = response;
    }

    pub fn set_failing(&self, failing: bool) {
        self.fail.store(failing, Ordering::SeqCst);
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn last_prompt(&self) -> String {
        self.prompts.lock().unwrap().last().cloned().unwrap_or_default()
    }
}

#[async_trait]
impl TextGenerator for ScriptedClient {
    async fn generate(&self, prompt: &str) -> LlmResult<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.prompts.lock().unwrap().push(prompt.to_string());

        if self.fail.load(Ordering::SeqCst) {
            return Err(LlmError::ServerError {
                message: "overloaded".to_string(),
                status: Some(503),
            });
        }

        if prompt.contains("exactly one JSON object") {
            return Ok(self.extraction_response.lock().unwrap().clone());
        }
        if prompt.contains("alternative world names") {
            return self.suggestion_response.lock().unwrap().clone();
        }

        let topic = prompt
            .lines()
            .find_map(|line| line.strip_prefix("- Name: "))
            .unwrap_or("your world");
        Ok(format!("Tell me about {}?", topic))
    }
}

/// World generator whose success can be toggled
pub struct SwitchableGenerator {
    pub available: AtomicBool,
    pub calls: AtomicUsize,
}

impl SwitchableGenerator {
    pub fn new(available: bool) -> Self {
        Self {
            available: AtomicBool::new(available),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn set_available(&self, available: bool) {
        self.available.store(available, Ordering::SeqCst);
    }
}

#[async_trait]
impl WorldGenerator for SwitchableGenerator {
    async fn generate_world(
        &self,
        _world_id: &str,
        _config: &WorldConfiguration,
    ) -> Result<GeneratedWorld, GeneratorError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if !self.available.load(Ordering::SeqCst) {
            return Err(GeneratorError::Failed("terrain solver diverged".to_string()));
        }
        Ok(GeneratedWorld {
            geography: json!({ "continents": 3 }),
            weather: json!({ "storms": "seasonal" }),
            metadata: GenerationMetadata {
                seed: 1234,
                generation_time_ms: 250,
                sea_level: 0.45,
                land_ratio: 0.32,
                width: 1024,
                height: 512,
            },
        })
    }
}

pub struct Harness {
    pub service: InterviewService,
    pub client: Arc<ScriptedClient>,
    pub generator: Arc<SwitchableGenerator>,
    pub repository: Arc<SqliteInterviewRepository>,
    pub worlds: Arc<SqliteWorldRepository>,
}

impl Harness {
    pub fn new() -> Self {
        Self::with_generator(true)
    }

    pub fn with_generator(available: bool) -> Self {
        let db = Database::new_in_memory().unwrap();
        let client = Arc::new(ScriptedClient::new());
        let generator = Arc::new(SwitchableGenerator::new(available));
        let repository = Arc::new(SqliteInterviewRepository::new(db.pool().clone()));
        let worlds = Arc::new(SqliteWorldRepository::new(db.pool().clone()));

        let trigger =
            WorldCreationTrigger::new(worlds.clone(), generator.clone(), WorldDefaults::default());
        let service = InterviewService::new(repository.clone(), client.clone(), trigger);

        Self {
            service,
            client,
            generator,
            repository,
            worlds,
        }
    }

    /// Start an interview and answer every topic before World Name
    pub async fn answer_until_name(&self, user: &str) -> InterviewReply {
        let mut reply = self.service.start(user).await.unwrap();
        for answer in ANSWERS {
            reply = self.service.process(user, answer).await.unwrap();
        }
        reply
    }

    /// Answer every topic, naming the world `name`, ending in Review
    pub async fn answer_all(&self, user: &str, name: &str) -> InterviewReply {
        self.answer_until_name(user).await;
        self.service.process(user, name).await.unwrap()
    }

    pub fn answer(&self, user: &str, index: usize) -> Option<String> {
        let interview = self.repository.get_interview(user).unwrap()?;
        self.repository
            .get_answers(&interview.id)
            .unwrap()
            .into_iter()
            .find(|a| a.question_index == index)
            .map(|a| a.answer_text)
    }
}
