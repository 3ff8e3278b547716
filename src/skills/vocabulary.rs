// src/skills/vocabulary.rs
//! Known skill keywords, loaded once at startup and shared read-only.

use anyhow::{Context, Result};
use std::collections::HashSet;
use std::path::Path;
use tracing::info;

/// Immutable, lower-cased, de-duplicated list of skill strings.
#[derive(Debug, Clone)]
pub struct SkillVocabulary {
    skills: Vec<String>,
}

impl SkillVocabulary {
    /// Build a vocabulary from raw entries. Entries are trimmed and
    /// lower-cased; blanks are dropped and the first occurrence of a
    /// duplicate keeps its position.
    pub fn new<I, S>(entries: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut seen = HashSet::new();
        let skills = entries
            .into_iter()
            .map(|s| s.as_ref().trim().to_lowercase())
            .filter(|s| !s.is_empty())
            .filter(|s| seen.insert(s.clone()))
            .collect();

        Self { skills }
    }

    /// The built-in vocabulary.
    pub fn builtin() -> Self {
        Self::new(DEFAULT_SKILLS)
    }

    /// Load a vocabulary file: one skill per line, `#` starts a comment line.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read skills file: {}", path.display()))?;

        let vocabulary = Self::from_lines(&content);
        if vocabulary.is_empty() {
            anyhow::bail!("Skills file contains no entries: {}", path.display());
        }

        info!(
            "Loaded {} skills from {}",
            vocabulary.len(),
            path.display()
        );
        Ok(vocabulary)
    }

    pub fn from_lines(content: &str) -> Self {
        Self::new(
            content
                .lines()
                .map(str::trim)
                .filter(|line| !line.starts_with('#')),
        )
    }

    /// Load from `path` when given, otherwise fall back to the built-in list.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::from_file(path),
            None => Ok(Self::builtin()),
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> + '_ {
        self.skills.iter().map(String::as_str)
    }

    pub fn contains(&self, skill: &str) -> bool {
        self.skills.iter().any(|s| s == skill)
    }

    pub fn len(&self) -> usize {
        self.skills.len()
    }

    pub fn is_empty(&self) -> bool {
        self.skills.is_empty()
    }
}

impl Default for SkillVocabulary {
    fn default() -> Self {
        Self::builtin()
    }
}

const DEFAULT_SKILLS: &[&str] = &[
    "python", "Data Analysis", "Machine Learning", "Communication", "Project Management",
    "Deep Learning", "SQL", "Tableau", "Java", "C++", "JavaScript", "HTML", "CSS", "React",
    "Angular", "Node.js", "MongoDB", "R", "Express.js", "Git", "Research", "Statistics",
    "Quantitative Analysis", "Qualitative Analysis", "SPSS", "Data Visualization",
    "Matplotlib", "Seaborn", "Plotly", "Pandas", "Numpy", "Scikit-learn", "TensorFlow",
    "Keras", "PyTorch", "NLTK", "Text Mining", "Natural Language Processing",
    "Computer Vision", "Image Processing", "OCR", "Speech Recognition",
    "Recommendation Systems", "Collaborative Filtering", "Content-Based Filtering",
    "Reinforcement Learning", "Neural Networks", "Convolutional Neural Networks",
    "Recurrent Neural Networks", "Generative Adversarial Networks", "XGBoost", "Random Forest",
    "Decision Trees", "Support Vector Machines", "Linear Regression", "Logistic Regression",
    "K-Means Clustering", "Hierarchical Clustering", "DBSCAN", "Association Rule Learning",
    "Apache Hadoop", "Apache Spark", "MapReduce", "Hive", "HBase", "Apache Kafka",
    "Data Warehousing", "ETL", "Big Data Analytics", "Cloud Computing",
    "Amazon Web Services (AWS)", "Microsoft Azure", "Google Cloud Platform (GCP)", "Docker",
    "Kubernetes", "Linux", "Shell Scripting", "Cybersecurity", "Network Security",
    "Penetration Testing", "Firewalls", "Encryption", "Malware Analysis", "Digital Forensics",
    "CI/CD", "DevOps", "Agile Methodology", "Scrum", "Kanban", "Continuous Integration",
    "Continuous Deployment", "Software Development", "Web Development", "Mobile Development",
    "Backend Development", "Frontend Development", "Full-Stack Development", "UI/UX Design",
    "Responsive Design", "Wireframing", "Prototyping", "User Testing", "Adobe Creative Suite",
    "Photoshop", "Illustrator", "InDesign", "Figma", "Sketch", "Zeplin", "InVision",
    "Product Management", "Market Research", "Customer Development", "Lean Startup",
    "Business Development", "Sales", "Marketing", "Content Marketing",
    "Social Media Marketing", "Email Marketing", "SEO", "SEM", "PPC", "Google Analytics",
    "Facebook Ads", "LinkedIn Ads", "Lead Generation",
    "Customer Relationship Management (CRM)", "Salesforce", "HubSpot", "Zendesk", "Intercom",
    "Customer Support", "Technical Support", "Troubleshooting", "Ticketing Systems",
    "ServiceNow", "ITIL", "Quality Assurance", "Manual Testing", "Automated Testing",
    "Selenium", "JUnit", "Load Testing", "Performance Testing", "Regression Testing",
    "Black Box Testing", "White Box Testing", "API Testing", "Mobile Testing",
    "Usability Testing", "Accessibility Testing", "Cross-Browser Testing", "Agile Testing",
    "User Acceptance Testing", "Software Documentation", "Technical Writing", "Copywriting",
    "Editing", "Proofreading", "Content Management Systems (CMS)", "WordPress", "Joomla",
    "Drupal", "Magento", "Shopify", "E-commerce", "Payment Gateways", "Inventory Management",
    "Supply Chain Management", "Logistics", "Procurement", "ERP Systems", "SAP", "Oracle",
    "Microsoft Dynamics", "Tableau", "Power BI", "QlikView", "Looker", "Data Warehousing",
    "ETL", "Data Engineering", "Data Governance", "Data Quality", "Master Data Management",
    "Beautiful Soup", "NLP", "Predictive Analytics", "Prescriptive Analytics",
    "Descriptive Analytics", "Business Intelligence", "Dashboarding", "Reporting",
    "Data Mining", "Web Scraping", "API Integration", "RESTful APIs", "GraphQL", "SOAP",
    "Microservices", "Serverless Architecture", "Lambda Functions",
    "Event-Driven Architecture", "Message Queues", "GraphQL", "Socket.io", "WebSockets",
    "Ruby", "Ruby on Rails", "PHP", "Symfony", "Laravel", "CakePHP", "Zend Framework",
    "ASP.NET", "C#", "VB.NET", "ASP.NET MVC", "Entity Framework", "Spring", "Hibernate",
    "Struts", "Kotlin", "Swift", "Objective-C", "iOS Development", "Android Development",
    "Flutter", "React Native", "Ionic", "Mobile UI/UX Design", "Material Design", "SwiftUI",
    "RxJava", "RxSwift", "Django", "Flask", "FastAPI", "Falcon", "Tornado", "WebSockets",
    "GraphQL", "RESTful Web Services", "SOAP", "Microservices Architecture",
    "Serverless Computing", "AWS Lambda", "Google Cloud Functions", "Azure Functions",
    "Server Administration", "System Administration", "Network Administration",
    "Database Administration", "MySQL", "PostgreSQL", "SQLite", "Microsoft SQL Server",
    "Oracle Database", "NoSQL", "MongoDB", "Cassandra", "Redis", "Elasticsearch", "Firebase",
    "Google Analytics", "Google Tag Manager", "Adobe Analytics", "Marketing Automation",
    "Customer Data Platforms", "Segment", "Salesforce Marketing Cloud", "HubSpot CRM",
    "Zapier", "IFTTT", "Workflow Automation", "Robotic Process Automation (RPA)",
    "UI Automation", "Natural Language Generation (NLG)", "Virtual Reality (VR)",
    "Augmented Reality (AR)", "Mixed Reality (MR)", "Unity", "Unreal Engine", "3D Modeling",
    "Animation", "Motion Graphics", "Game Design", "Game Development", "Level Design",
    "Unity3D", "Unreal Engine 4", "Blender", "Maya", "Adobe After Effects",
    "Adobe Premiere Pro", "Final Cut Pro", "Video Editing", "Audio Editing", "Sound Design",
    "Music Production", "Digital Marketing", "Content Strategy",
    "Conversion Rate Optimization (CRO)", "A/B Testing", "Customer Experience (CX)",
    "User Experience (UX)", "User Interface (UI)", "Persona Development",
    "User Journey Mapping", "Information Architecture (IA)", "Wireframing", "Prototyping",
    "Usability Testing", "Accessibility Compliance", "Internationalization (I18n)",
    "Localization (L10n)", "Voice User Interface (VUI)", "Chatbots",
    "Natural Language Understanding (NLU)", "Speech Synthesis", "Emotion Detection",
    "Sentiment Analysis", "Image Recognition", "Object Detection", "Facial Recognition",
    "Gesture Recognition", "Document Recognition", "Fraud Detection",
    "Cyber Threat Intelligence", "Security Information and Event Management (SIEM)",
    "Vulnerability Assessment", "Incident Response", "Forensic Analysis",
    "Security Operations Center (SOC)", "Identity and Access Management (IAM)",
    "Single Sign-On (SSO)", "Multi-Factor Authentication (MFA)", "Blockchain",
    "Cryptocurrency", "Decentralized Finance (DeFi)", "Smart Contracts", "Web3",
    "Non-Fungible Tokens (NFTs)", "Rust", "Go (Golang)", "TypeScript", "Svelte", "Vue.js",
    "Electron.js", "Deno", "Bash Scripting", "Perl", "Groovy", "Scala", "ColdFusion",
    "LightGBM", "CatBoost", "AutoML", "H2O.ai", "OpenAI APIs", "Hugging Face", "Transformers",
    "Few-Shot Learning", "Retrieval-Augmented Generation", "Zero-Shot Learning",
    "Transfer Learning", "Bayesian Optimization", "Hyperparameter Tuning",
    "Explainable AI (XAI)", "TensorFlow", "PyTorch Lightning", "Federated Learning", "Edge AI",
    "Alteryx", "KNIME", "RapidMiner", "DataRobot", "Snowflake", "Azure Synapse Analytics",
    "HuggingFace", "Data Lineage", "Time Series Analysis", "Anomaly Detection",
    "Hypothesis Testing", "Terraform", "Ansible", "Puppet", "Chef", "Jenkins", "Spinnaker",
    "Istio", "Prometheus", "Grafana", "Elastic Stack (ELK)", "Consul", "OpenShift",
    "CloudFormation", "PyTorch", "RAG", "AWS Sagemaker", "Cloudflare", "Neo4j",
    "Amazon Redshift", "DynamoDB", "CockroachDB", "Greenplum",
    "Hadoop Distributed File System (HDFS)", "Amazon S3", "Ceph", "MinIO", "OWASP",
    "Threat Modeling", "SIEM Tools (Splunk, QRadar)", "Identity Federation", "Gen ai", "GenAI",
    "Secure Software Development Lifecycle (SSDLC)",
    "Kubernetes Security (K8s security tools like Falco, Aqua Security)",
    "Cloud Security (AWS Security Hub, Azure Security Center)", "Solidity",
    "Hyperledger Fabric", "Ethereum Virtual Machine (EVM)", "Polkadot", "Cosmos", "Chainlink",
    "Metamask Integration", "Decentralized Applications (dApps)",
    "IPFS (InterPlanetary File System)", "CorelDRAW", "Affinity Designer", "Canva", "GIMP",
    "DaVinci Resolve", "Cinema 4D", "Houdini", "Jira", "Trello", "Confluence", "Airtable",
    "Monday.com", "Basecamp", "Notion", "Miro", "Quantum Computing", "Tensor Networks",
    "Neuromorphic Computing", "Edge Computing", "5G Networking",
    "Remote Desktop Tools (TeamViewer, AnyDesk)", "API Management (Postman, Swagger)",
    "IT Asset Management", "ChatGPT Plugins Development", "SaaS Product Development",
    "Generative AI", "BeautifulSoup",
];
