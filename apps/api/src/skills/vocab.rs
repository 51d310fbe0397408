//! Fixed skill vocabulary and per-career reference skill sets.
//!
//! Canonical skills are lowercase. The vocabulary is the union of every
//! career's reference set plus cross-cutting technical and soft skills;
//! `SkillExtractor` recognizes nothing outside it.

/// Reference skills per career, used by the keyword rubric component and as
/// the career catalog for classifier fallbacks. Keys are canonical lowercase
/// career names.
pub const CAREER_SKILLS: &[(&str, &[&str])] = &[
    (
        "data scientist",
        &[
            "python",
            "machine learning",
            "statistics",
            "sql",
            "tensorflow",
            "pandas",
            "numpy",
            "scikit-learn",
            "deep learning",
            "data visualization",
        ],
    ),
    (
        "frontend developer",
        &[
            "html",
            "css",
            "javascript",
            "react",
            "vue",
            "typescript",
            "angular",
            "webpack",
            "sass",
            "responsive design",
        ],
    ),
    (
        "backend developer",
        &[
            "python",
            "java",
            "nodejs",
            "sql",
            "api",
            "docker",
            "mongodb",
            "postgresql",
            "rest",
            "microservices",
        ],
    ),
    (
        "full stack developer",
        &[
            "javascript",
            "react",
            "nodejs",
            "python",
            "sql",
            "html",
            "css",
            "git",
            "docker",
            "rest api",
        ],
    ),
    (
        "mobile app developer",
        &[
            "flutter",
            "react native",
            "swift",
            "kotlin",
            "android",
            "ios",
            "dart",
            "mobile ui",
            "firebase",
        ],
    ),
    (
        "devops engineer",
        &[
            "docker",
            "kubernetes",
            "aws",
            "azure",
            "ci/cd",
            "jenkins",
            "terraform",
            "linux",
            "ansible",
            "monitoring",
        ],
    ),
    (
        "machine learning engineer",
        &[
            "python",
            "tensorflow",
            "pytorch",
            "machine learning",
            "deep learning",
            "neural networks",
            "nlp",
            "computer vision",
            "mlops",
        ],
    ),
    (
        "software engineer",
        &[
            "python",
            "java",
            "javascript",
            "sql",
            "git",
            "algorithms",
            "data structures",
            "oop",
            "testing",
        ],
    ),
    (
        "web developer",
        &[
            "html",
            "css",
            "javascript",
            "php",
            "mysql",
            "responsive design",
            "wordpress",
            "bootstrap",
        ],
    ),
    (
        "data analyst",
        &[
            "python",
            "sql",
            "excel",
            "tableau",
            "data visualization",
            "statistics",
            "pandas",
            "power bi",
        ],
    ),
    (
        "project manager",
        &[
            "agile",
            "scrum",
            "jira",
            "communication",
            "leadership",
            "risk management",
            "budgeting",
            "planning",
        ],
    ),
    (
        "hr manager",
        &[
            "recruitment",
            "employee relations",
            "payroll",
            "hris",
            "training",
            "labor law",
            "performance management",
            "benefits administration",
        ],
    ),
    (
        "recruiter",
        &[
            "talent acquisition",
            "interviewing",
            "sourcing",
            "onboarding",
            "screening",
        ],
    ),
    (
        "digital marketer",
        &[
            "seo",
            "ppc",
            "social media",
            "email marketing",
            "google ads",
            "content marketing",
            "google analytics",
        ],
    ),
    (
        "financial analyst",
        &[
            "financial modeling",
            "excel",
            "budgeting",
            "forecasting",
            "valuation",
            "financial reporting",
        ],
    ),
    (
        "accountant",
        &[
            "accounting",
            "taxation",
            "bookkeeping",
            "auditing",
            "gaap",
            "financial statements",
            "quickbooks",
        ],
    ),
    (
        "sales manager",
        &[
            "sales",
            "crm",
            "negotiation",
            "lead generation",
            "team management",
            "pipeline management",
            "forecasting",
        ],
    ),
    (
        "operations manager",
        &[
            "supply chain",
            "logistics",
            "inventory",
            "process improvement",
            "operations management",
            "vendor management",
        ],
    ),
];

/// Skills recognized on top of the per-career sets: adjacent technologies and
/// soft skills that appear in resumes but belong to no single career.
pub const EXTRA_SKILLS: &[&str] = &[
    "rust",
    "golang",
    "ruby",
    "scala",
    "node.js",
    "graphql",
    "redis",
    "elasticsearch",
    "kafka",
    "spark",
    "django",
    "flask",
    "spring",
    "express",
    "gcp",
    "grafana",
    "prometheus",
    "figma",
    "ui/ux",
    "teamwork",
    "problem solving",
    "project management",
    "analytical",
    "critical thinking",
    "mentoring",
    "public speaking",
];

/// All careers the engine knows, sorted ascending for deterministic output.
pub fn career_catalog() -> Vec<&'static str> {
    let mut careers: Vec<&str> = CAREER_SKILLS.iter().map(|(c, _)| *c).collect();
    careers.sort_unstable();
    careers
}

/// Reference skill set for a career, or `None` for unknown careers.
pub fn reference_skills(career: &str) -> Option<&'static [&'static str]> {
    let needle = career.trim().to_lowercase();
    CAREER_SKILLS
        .iter()
        .find(|(c, _)| *c == needle)
        .map(|(_, skills)| *skills)
}

/// Full deduplicated vocabulary, sorted ascending.
pub fn vocabulary() -> Vec<&'static str> {
    let mut all: Vec<&str> = CAREER_SKILLS
        .iter()
        .flat_map(|(_, skills)| skills.iter().copied())
        .chain(EXTRA_SKILLS.iter().copied())
        .collect();
    all.sort_unstable();
    all.dedup();
    all
}
