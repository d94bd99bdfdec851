//! Local question generator: deterministic template lookup, no network.
//!
//! A technology name is matched against template families by lowercase substring.
//! Each template carries its category, difficulty and the keywords a good answer
//! is expected to mention. `{tech}` is replaced with the name as the candidate typed it.

use uuid::Uuid;

use crate::interview::evaluator::tokenize;
use crate::models::question::{Difficulty, Question, QuestionCategory, QuestionSource};

pub const MIN_QUESTIONS: usize = 3;
pub const MAX_QUESTIONS: usize = 5;

use crate::models::question::Difficulty::{Advanced, Beginner, Intermediate};
use crate::models::question::QuestionCategory::{Coding, Conceptual, Debugging, Design, Experience};

pub struct Template {
    pub category: QuestionCategory,
    pub difficulty: Difficulty,
    pub text: &'static str,
    pub keywords: &'static [&'static str],
}

pub struct Family {
    pub name: &'static str,
    /// Lowercase substrings that select this family. Checked in declaration order.
    pub matchers: &'static [&'static str],
    pub templates: &'static [Template],
}

const fn t(
    category: QuestionCategory,
    difficulty: Difficulty,
    text: &'static str,
    keywords: &'static [&'static str],
) -> Template {
    Template {
        category,
        difficulty,
        text,
        keywords,
    }
}

/// Every question set opens with this one.
const OPENER: Template = t(
    Experience,
    Beginner,
    "Explain a recent project where you used {tech}. What was your role and the biggest challenge?",
    &["project", "role", "challenge", "team", "result", "built"],
);

static GENERIC: Family = Family {
    name: "generic",
    matchers: &[],
    templates: &[
        t(Conceptual, Beginner, "What are the key concepts of {tech}?",
            &["concept", "feature", "purpose", "example", "use"]),
        t(Coding, Beginner, "Write a small program or snippet using {tech} that reads input, processes it and reports errors. Walk through it.",
            &["input", "error", "function", "output", "test"]),
        t(Debugging, Intermediate, "Describe a debugging approach you follow when a {tech} based solution fails in production.",
            &["logs", "reproduce", "monitoring", "root", "cause", "fix"]),
        t(Coding, Intermediate, "How do you test code built with {tech}? Describe the tools and the layers you cover.",
            &["unit", "integration", "mock", "coverage", "automated", "test"]),
        t(Conceptual, Advanced, "Which limitations of {tech} have you hit, and how did you work around them?",
            &["limitation", "performance", "workaround", "alternative", "tradeoff"]),
        t(Design, Advanced, "How would you design a scalable, maintainable system around {tech}? Which trade-offs matter most?",
            &["scalability", "performance", "maintainability", "cost", "architecture", "testing"]),
    ],
};

static FAMILIES: &[Family] = &[
    Family {
        name: "python",
        matchers: &["python"],
        templates: &[
            t(Conceptual, Beginner, "What is the difference between a list and a tuple in Python? When would you use each?",
                &["mutable", "immutable", "hashable", "list", "tuple"]),
            t(Coding, Beginner, "Write a function that counts word frequencies in a string. Which built-in data structures help?",
                &["dict", "counter", "split", "loop", "lower"]),
            t(Conceptual, Intermediate, "Describe the difference between deep and shallow copies in Python. Give examples.",
                &["copy", "deepcopy", "reference", "nested", "mutable"]),
            t(Coding, Intermediate, "How would you write a generator that streams lines from a large file? Why use one?",
                &["yield", "generator", "memory", "lazy", "iterator"]),
            t(Debugging, Intermediate, "A Python service slowly leaks memory. How do you track down the cause?",
                &["tracemalloc", "reference", "profiler", "gc", "leak"]),
            t(Conceptual, Advanced, "Explain the Global Interpreter Lock. How does it affect threads, processes and asyncio?",
                &["gil", "thread", "process", "multiprocessing", "asyncio", "cpu"]),
            t(Coding, Advanced, "How do you optimize Python code for performance? Name tools or techniques you use.",
                &["profile", "cprofile", "numpy", "cache", "vectorize", "cython"]),
            t(Design, Advanced, "How do you structure and package a large Python codebase shared by several teams?",
                &["module", "package", "dependency", "typing", "test", "interface"]),
        ],
    },
    Family {
        name: "web-framework",
        matchers: &["django", "flask", "fastapi"],
        templates: &[
            t(Conceptual, Beginner, "What is the request/response lifecycle in {tech}?",
                &["request", "response", "route", "view", "middleware", "template"]),
            t(Conceptual, Intermediate, "How do you handle authentication and authorization in {tech}?",
                &["session", "token", "permission", "user", "decorator", "middleware"]),
            t(Design, Intermediate, "Explain how you structure a medium-sized web application using {tech}.",
                &["blueprint", "app", "model", "view", "service", "config"]),
            t(Coding, Intermediate, "How do you write a REST endpoint in {tech} that validates input and returns JSON errors?",
                &["serializer", "validation", "json", "status", "schema"]),
            t(Debugging, Advanced, "An endpoint in {tech} became slow after a release. How do you find the cause?",
                &["query", "orm", "index", "profiling", "cache", "logs"]),
            t(Design, Advanced, "How would you scale a {tech} application to handle ten times the traffic?",
                &["cache", "worker", "database", "replica", "load", "async"]),
        ],
    },
    Family {
        name: "sql",
        matchers: &["sql", "postgres", "oracle", "sqlite"],
        templates: &[
            t(Conceptual, Beginner, "What is the difference between INNER JOIN and LEFT JOIN? Give an example.",
                &["join", "null", "rows", "match", "left", "inner"]),
            t(Coding, Beginner, "Write a query that returns the top five customers by total order amount.",
                &["sum", "group", "order", "limit", "join"]),
            t(Coding, Intermediate, "Write a SQL query to find duplicate rows in a table and remove them.",
                &["group", "having", "count", "delete", "partition"]),
            t(Conceptual, Intermediate, "Explain indexes. When do indexes hurt performance?",
                &["index", "write", "insert", "btree", "selectivity", "scan"]),
            t(Debugging, Advanced, "A query that used to run in milliseconds now takes seconds. How do you diagnose it?",
                &["explain", "plan", "index", "statistics", "lock", "vacuum"]),
            t(Design, Advanced, "Explain transaction isolation levels and an anomaly each one prevents.",
                &["isolation", "dirty", "phantom", "serializable", "repeatable", "committed"]),
        ],
    },
    Family {
        name: "cloud",
        matchers: &["aws", "gcp", "azure", "google cloud"],
        templates: &[
            t(Conceptual, Beginner, "What is the difference between IaaS, PaaS and serverless offerings on {tech}?",
                &["infrastructure", "platform", "serverless", "managed", "scaling"]),
            t(Design, Intermediate, "Which services do you use for deploying a scalable API on {tech}? Why?",
                &["load", "balancer", "container", "autoscaling", "database", "cdn"]),
            t(Conceptual, Intermediate, "How do you manage identities, secrets and least privilege on {tech}?",
                &["iam", "role", "policy", "secret", "vault", "privilege"]),
            t(Debugging, Intermediate, "A deployment on {tech} returns intermittent 5xx errors. What do you check first?",
                &["logs", "metrics", "health", "timeout", "scaling", "alarm"]),
            t(Coding, Advanced, "How do you manage {tech} infrastructure as code? Describe your workflow.",
                &["terraform", "cloudformation", "module", "review", "state", "pipeline"]),
            t(Design, Advanced, "How do you design for high availability and disaster recovery in cloud?",
                &["region", "zone", "backup", "failover", "replication", "rto"]),
        ],
    },
    Family {
        name: "deep-learning",
        matchers: &["pytorch", "tensorflow", "keras", "torch"],
        templates: &[
            t(Conceptual, Beginner, "What is the difference between training, validation and test sets?",
                &["training", "validation", "test", "overfitting", "generalization"]),
            t(Conceptual, Intermediate, "Explain the difference between model.train() and model.eval().",
                &["dropout", "batchnorm", "gradient", "inference", "mode"]),
            t(Conceptual, Intermediate, "How do you prevent overfitting? List techniques and give examples.",
                &["regularization", "dropout", "augmentation", "early", "stopping", "validation"]),
            t(Coding, Intermediate, "Write the skeleton of a training loop in {tech}. What happens in each step?",
                &["forward", "loss", "backward", "optimizer", "gradient", "epoch"]),
            t(Debugging, Advanced, "Your model's loss becomes NaN mid-training. How do you debug it?",
                &["learning", "rate", "gradient", "clipping", "normalization", "nan"]),
            t(Design, Advanced, "How do you serve a {tech} model in production with low latency?",
                &["batching", "quantization", "onnx", "gpu", "cache", "monitoring"]),
        ],
    },
    Family {
        name: "frontend",
        matchers: &["react", "vue", "angular", "svelte"],
        templates: &[
            t(Conceptual, Beginner, "What are components and props? How does data flow between them in {tech}?",
                &["component", "props", "state", "parent", "child", "event"]),
            t(Conceptual, Intermediate, "Explain how state management works in your chosen frontend framework.",
                &["state", "store", "redux", "context", "reactive", "immutable"]),
            t(Coding, Intermediate, "How do you fetch data from an API in {tech} and handle loading and error states?",
                &["fetch", "async", "loading", "error", "effect", "state"]),
            t(Debugging, Intermediate, "A {tech} page re-renders constantly and feels sluggish. How do you investigate?",
                &["profiler", "render", "memo", "dependency", "devtools", "key"]),
            t(Design, Advanced, "How do you optimize rendering performance for complex UI components?",
                &["memoization", "virtualization", "lazy", "splitting", "render", "profiling"]),
            t(Design, Advanced, "How would you structure a large {tech} codebase shared by several teams?",
                &["module", "component", "library", "typescript", "testing", "boundaries"]),
        ],
    },
    Family {
        name: "rust",
        matchers: &["rust"],
        templates: &[
            t(Conceptual, Beginner, "Explain ownership and borrowing in Rust.",
                &["ownership", "borrow", "reference", "lifetime", "move", "mutable"]),
            t(Coding, Intermediate, "How do you model and propagate errors in a Rust library versus an application?",
                &["result", "enum", "thiserror", "anyhow", "propagate", "trait"]),
            t(Debugging, Intermediate, "The borrow checker rejects code you believe is correct. How do you work through it?",
                &["lifetime", "clone", "scope", "reference", "refactor", "borrow"]),
            t(Conceptual, Advanced, "When would you reach for Arc<Mutex<T>> versus message passing?",
                &["arc", "mutex", "channel", "send", "sync", "contention"]),
            t(Design, Advanced, "How do you design an async Rust service? Discuss runtimes, cancellation and backpressure.",
                &["tokio", "async", "cancellation", "backpressure", "channel", "timeout"]),
        ],
    },
    Family {
        name: "javascript",
        matchers: &["javascript", "typescript", "node", "express"],
        templates: &[
            t(Conceptual, Beginner, "Explain the difference between var, let and const.",
                &["scope", "hoisting", "block", "reassign", "const"]),
            t(Conceptual, Intermediate, "Explain the event loop and how promises are scheduled.",
                &["event", "loop", "microtask", "promise", "callback", "queue"]),
            t(Coding, Intermediate, "How do you handle errors in async/await code?",
                &["try", "catch", "promise", "reject", "await", "finally"]),
            t(Debugging, Advanced, "A Node.js service's memory grows until it crashes. How do you find the leak?",
                &["heap", "snapshot", "closure", "listener", "profiler", "leak"]),
            t(Design, Advanced, "How would you structure a Node.js API for scalability and observability?",
                &["cluster", "worker", "logging", "metrics", "middleware", "cache"]),
        ],
    },
    Family {
        name: "java",
        matchers: &["java", "spring", "kotlin"],
        templates: &[
            t(Conceptual, Beginner, "What is the difference between an interface and an abstract class in Java?",
                &["interface", "abstract", "implement", "inheritance", "method", "default"]),
            t(Conceptual, Intermediate, "Explain dependency injection and how Spring manages beans.",
                &["bean", "injection", "container", "scope", "autowired", "singleton"]),
            t(Coding, Intermediate, "How do you implement equals and hashCode correctly? Why does it matter?",
                &["equals", "hashcode", "hashmap", "contract", "immutable"]),
            t(Debugging, Advanced, "A Java service shows long GC pauses under load. How do you investigate?",
                &["heap", "gc", "profiler", "allocation", "dump", "tuning"]),
            t(Design, Advanced, "How do you design transactions and concurrency control in a Spring application?",
                &["transactional", "isolation", "lock", "optimistic", "rollback", "propagation"]),
        ],
    },
    Family {
        name: "containers",
        matchers: &["docker", "kubernetes", "k8s"],
        templates: &[
            t(Conceptual, Beginner, "What is the difference between an image and a container?",
                &["image", "container", "layer", "runtime", "registry"]),
            t(Coding, Intermediate, "Write a Dockerfile for a small web service. How do you keep the image small?",
                &["multi", "stage", "alpine", "layer", "cache", "copy"]),
            t(Debugging, Intermediate, "A pod keeps restarting in CrashLoopBackOff. What do you check?",
                &["logs", "describe", "probe", "events", "memory", "config"]),
            t(Conceptual, Advanced, "Explain how Kubernetes networking and services route traffic to pods.",
                &["service", "ingress", "dns", "proxy", "label", "selector"]),
            t(Design, Advanced, "How do you roll out a new version with zero downtime on Kubernetes?",
                &["rolling", "readiness", "probe", "deployment", "canary", "rollback"]),
        ],
    },
];

/// Family for a technology name. Families are checked in order so "javascript"
/// is claimed before "java" can match it.
pub fn family_for(tech: &str) -> &'static Family {
    let lowered = tech.trim().to_lowercase();
    FAMILIES
        .iter()
        .find(|f| f.matchers.iter().any(|m| lowered.contains(m)))
        .unwrap_or(&GENERIC)
}

/// Produces `count` questions (clamped to 3–5) for one technology.
///
/// Order: the experience opener, then family templates closest to the requested
/// difficulty with one template per category before any category repeats, then
/// generic templates to fill.
pub fn generate_local(tech: &str, count: usize, difficulty: Difficulty) -> Vec<Question> {
    let count = count.clamp(MIN_QUESTIONS, MAX_QUESTIONS);
    let tech = tech.trim();
    let family = family_for(tech);

    let mut picked: Vec<&'static Template> = vec![&OPENER];
    pick_balanced(&mut picked, family.templates, difficulty, count);
    if picked.len() < count && family.name != GENERIC.name {
        pick_balanced(&mut picked, GENERIC.templates, difficulty, count);
    }

    picked
        .into_iter()
        .take(count)
        .map(|template| build_question(tech, template, difficulty))
        .collect()
}

fn pick_balanced(
    picked: &mut Vec<&'static Template>,
    templates: &'static [Template],
    difficulty: Difficulty,
    count: usize,
) {
    let mut ordered: Vec<&'static Template> = templates.iter().collect();
    // Stable sort keeps declaration order within the same distance.
    ordered.sort_by_key(|t| (t.difficulty as i32 - difficulty as i32).abs());

    // First pass: categories not yet covered.
    for &template in &ordered {
        if picked.len() >= count {
            return;
        }
        if !picked.iter().any(|p| p.category == template.category) {
            picked.push(template);
        }
    }
    // Second pass: anything not already picked.
    for &template in &ordered {
        if picked.len() >= count {
            return;
        }
        if !picked.iter().any(|p| std::ptr::eq(*p, template)) {
            picked.push(template);
        }
    }
}

fn build_question(tech: &str, template: &Template, requested: Difficulty) -> Question {
    let mut expected_keywords: Vec<String> =
        template.keywords.iter().map(|k| k.to_lowercase()).collect();
    for token in tokenize(tech) {
        if !expected_keywords.contains(&token) {
            expected_keywords.push(token);
        }
    }

    Question {
        id: Uuid::new_v4(),
        technology: tech.to_string(),
        text: template.text.replace("{tech}", tech),
        // The opener fits every level; report it at the level the candidate was placed.
        difficulty: if template.category == Experience {
            requested
        } else {
            template.difficulty
        },
        category: template.category,
        expected_keywords,
        source: QuestionSource::Local,
    }
}
