use super::TermCategory::{self, *};

/// Curated vocabulary loaded into a fresh store: (surface form, category, normalized key).
pub const SEED_TERMS: &[(&str, TermCategory, &str)] = &[
    // Languages
    ("Python", Language, "python"),
    ("JavaScript", Language, "javascript"),
    ("JS", Language, "javascript"),
    ("TypeScript", Language, "typescript"),
    ("TS", Language, "typescript"),
    ("Java", Language, "java"),
    ("C", Language, "c"),
    ("C++", Language, "cpp"),
    ("C#", Language, "csharp"),
    ("Go", Language, "go"),
    ("Golang", Language, "go"),
    ("Rust", Language, "rust"),
    ("Kotlin", Language, "kotlin"),
    ("Swift", Language, "swift"),
    ("PHP", Language, "php"),
    ("Ruby", Language, "ruby"),
    ("Scala", Language, "scala"),
    ("R", Language, "r"),
    ("MATLAB", Language, "matlab"),
    ("SQL", Language, "sql"),
    ("Dart", Language, "dart"),
    ("VHDL", Language, "vhdl"),
    ("Verilog", Language, "verilog"),
    ("Elixir", Language, "elixir"),
    ("Bash", Language, "shell"),
    ("Shell", Language, "shell"),
    // Frameworks
    ("React", Framework, "react"),
    ("ReactJS", Framework, "react"),
    ("React Native", Framework, "react_native"),
    ("Angular", Framework, "angular"),
    ("Vue", Framework, "vue"),
    ("Vue.js", Framework, "vue"),
    ("Next.js", Framework, "nextjs"),
    ("NextJS", Framework, "nextjs"),
    ("Django", Framework, "django"),
    ("Flask", Framework, "flask"),
    ("FastAPI", Framework, "fastapi"),
    ("Express", Framework, "express"),
    ("Express.js", Framework, "express"),
    ("Spring", Framework, "spring"),
    ("Spring Boot", Framework, "spring_boot"),
    ("SpringBoot", Framework, "spring_boot"),
    ("Rails", Framework, "rails"),
    ("Ruby on Rails", Framework, "rails"),
    ("Laravel", Framework, "laravel"),
    (".NET", Framework, "dotnet"),
    ("dotnet", Framework, "dotnet"),
    ("Node.js", Framework, "nodejs"),
    ("NodeJS", Framework, "nodejs"),
    ("Flutter", Framework, "flutter"),
    ("TensorFlow", Framework, "tensorflow"),
    ("PyTorch", Framework, "pytorch"),
    ("Pandas", Framework, "pandas"),
    // Tools
    ("Git", Tool, "git"),
    ("GitHub", Tool, "github"),
    ("GitLab", Tool, "gitlab"),
    ("Bitbucket", Tool, "bitbucket"),
    ("Docker", Tool, "docker"),
    ("Kubernetes", Tool, "kubernetes"),
    ("k8s", Tool, "kubernetes"),
    ("Jenkins", Tool, "jenkins"),
    ("Jira", Tool, "jira"),
    ("Confluence", Tool, "confluence"),
    ("Postman", Tool, "postman"),
    ("VSCode", Tool, "vscode"),
    ("Visual Studio Code", Tool, "vscode"),
    ("IntelliJ", Tool, "intellij"),
    ("Figma", Tool, "figma"),
    ("Terraform", Tool, "terraform"),
    ("Ansible", Tool, "ansible"),
    ("Power BI", Tool, "power_bi"),
    ("Excel", Tool, "excel"),
    // Platforms
    ("AWS", Platform, "aws"),
    ("Amazon Web Services", Platform, "aws"),
    ("Azure", Platform, "azure"),
    ("Microsoft Azure", Platform, "azure"),
    ("GCP", Platform, "gcp"),
    ("Google Cloud", Platform, "gcp"),
    ("Google Cloud Platform", Platform, "gcp"),
    ("Heroku", Platform, "heroku"),
    ("Vercel", Platform, "vercel"),
    ("Netlify", Platform, "netlify"),
    ("DigitalOcean", Platform, "digitalocean"),
    // Databases
    ("PostgreSQL", Database, "postgresql"),
    ("Postgres", Database, "postgresql"),
    ("MySQL", Database, "mysql"),
    ("MariaDB", Database, "mariadb"),
    ("MongoDB", Database, "mongodb"),
    ("Redis", Database, "redis"),
    ("Elasticsearch", Database, "elasticsearch"),
    ("Oracle", Database, "oracle"),
    ("SQL Server", Database, "sqlserver"),
    ("SQLite", Database, "sqlite"),
    ("DynamoDB", Database, "dynamodb"),
    ("Cassandra", Database, "cassandra"),
    ("Neo4j", Database, "neo4j"),
    // Practices
    ("Scrum", Practice, "scrum"),
    ("Kanban", Practice, "kanban"),
    ("Agile", Practice, "agile"),
    ("Ágil", Practice, "agile"),
    ("Waterfall", Practice, "waterfall"),
    ("DevOps", Practice, "devops"),
    ("CI/CD", Practice, "cicd"),
    ("TDD", Practice, "tdd"),
    ("Test Driven Development", Practice, "tdd"),
    ("BDD", Practice, "bdd"),
    ("Microservices", Practice, "microservices"),
    ("Microsserviços", Practice, "microservices"),
    ("REST", Practice, "rest"),
    ("RESTful", Practice, "rest"),
    ("GraphQL", Practice, "graphql"),
    ("SOAP", Practice, "soap"),
    // Project types
    ("Web", ProjectType, "web"),
    ("Sistema Web", ProjectType, "web"),
    ("Aplicação Web", ProjectType, "web"),
    ("Mobile", ProjectType, "mobile"),
    ("Aplicativo Mobile", ProjectType, "mobile"),
    ("Backend", ProjectType, "backend"),
    ("Frontend", ProjectType, "frontend"),
    ("Full Stack", ProjectType, "fullstack"),
    ("Fullstack", ProjectType, "fullstack"),
    ("API", ProjectType, "api"),
    ("REST API", ProjectType, "api"),
    ("Data Science", ProjectType, "data_science"),
    ("Machine Learning", ProjectType, "machine_learning"),
    ("ML", ProjectType, "machine_learning"),
    ("Inteligência Artificial", ProjectType, "ai"),
    ("IoT", ProjectType, "iot"),
    ("Internet das Coisas", ProjectType, "iot"),
    ("Embarcado", ProjectType, "embedded"),
    ("Embedded", ProjectType, "embedded"),
    ("Cloud", ProjectType, "cloud"),
    ("Desktop", ProjectType, "desktop"),
];

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn surface_and_category_pairs_are_unique() {
        let mut seen = HashSet::new();
        for (term, category, _) in SEED_TERMS {
            assert!(seen.insert((term.to_lowercase(), *category)), "duplicate {term}");
        }
    }

    #[test]
    fn normalized_keys_are_lowercase_identifiers() {
        for (_, _, key) in SEED_TERMS {
            assert!(key
                .chars()
                .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_'));
        }
    }
}
