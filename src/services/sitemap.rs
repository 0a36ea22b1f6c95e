//! XML sitemap generation and search engine submission

use chrono::{NaiveDate, Utc};
use futures::future::join_all;
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;

use super::ContentError;
use crate::config::{PingEndpoint, SitemapConfig};
use crate::db::repositories::{BlogPostRepository, ProjectRepository, ShedRepository};
use crate::models::{BlogPost, PastProject};

const SITEMAP_NS: &str = "http://www.sitemaps.org/schemas/sitemap/0.9";

/// Routes that are always listed, with their change frequency and priority
const STATIC_ROUTES: [(&str, &str, f32); 3] = [
    ("/", "weekly", 1.0),
    ("/sheds", "weekly", 0.9),
    ("/blog", "daily", 0.8),
];

struct SitemapUrl {
    loc: String,
    lastmod: NaiveDate,
    changefreq: &'static str,
    priority: f32,
}

/// URL counts shown on the admin sitemap screen
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SitemapStats {
    pub total_urls: i64,
    pub blog_posts: i64,
    pub featured_projects: i64,
    pub active_sheds: i64,
}

/// Outcome of notifying one search engine
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PingResult {
    pub engine: String,
    pub success: bool,
    pub status: String,
}

fn escape_xml(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(c),
        }
    }
    out
}

/// Render the sitemap document.
///
/// `posts` should already be limited to published posts and `projects` to
/// featured ones.
pub fn render(base_url: &str, today: NaiveDate, posts: &[BlogPost], projects: &[PastProject]) -> String {
    let base = base_url.trim_end_matches('/');

    let mut urls: Vec<SitemapUrl> = STATIC_ROUTES
        .iter()
        .map(|(path, changefreq, priority)| SitemapUrl {
            loc: format!("{}{}", base, path),
            lastmod: today,
            changefreq,
            priority: *priority,
        })
        .collect();

    urls.extend(posts.iter().map(|post| SitemapUrl {
        loc: format!("{}/blog/{}", base, post.slug),
        lastmod: post.updated_at.date_naive(),
        changefreq: "monthly",
        priority: 0.6,
    }));

    urls.extend(projects.iter().map(|project| SitemapUrl {
        loc: format!("{}/projects/{}", base, project.id),
        lastmod: project.updated_at.date_naive(),
        changefreq: "monthly",
        priority: 0.5,
    }));

    let mut xml = String::from("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n");
    xml.push_str(&format!("<urlset xmlns=\"{}\">\n", SITEMAP_NS));
    for url in &urls {
        xml.push_str("  <url>\n");
        xml.push_str(&format!("    <loc>{}</loc>\n", escape_xml(&url.loc)));
        xml.push_str(&format!("    <lastmod>{}</lastmod>\n", url.lastmod.format("%Y-%m-%d")));
        xml.push_str(&format!("    <changefreq>{}</changefreq>\n", url.changefreq));
        xml.push_str(&format!("    <priority>{:.1}</priority>\n", url.priority));
        xml.push_str("  </url>\n");
    }
    xml.push_str("</urlset>\n");
    xml
}

/// Sitemap service
pub struct SitemapService {
    posts: Arc<dyn BlogPostRepository>,
    projects: Arc<dyn ProjectRepository>,
    sheds: Arc<dyn ShedRepository>,
    base_url: String,
    config: SitemapConfig,
    client: reqwest::Client,
}

impl SitemapService {
    pub fn new(
        posts: Arc<dyn BlogPostRepository>,
        projects: Arc<dyn ProjectRepository>,
        sheds: Arc<dyn ShedRepository>,
        base_url: impl Into<String>,
        config: SitemapConfig,
    ) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.ping_timeout_seconds.max(1)))
            .build()
            .unwrap_or_default();
        Self {
            posts,
            projects,
            sheds,
            base_url: base_url.into(),
            config,
            client,
        }
    }

    /// Absolute URL the sitemap is served from
    pub fn sitemap_url(&self) -> String {
        format!("{}/sitemap.xml", self.base_url.trim_end_matches('/'))
    }

    /// Build the sitemap from current content. Load failures leave the
    /// affected section out instead of failing the document.
    pub async fn generate(&self) -> String {
        let posts = self.posts.list_published().await.unwrap_or_else(|e| {
            tracing::error!("Failed to load blog posts for sitemap: {}", e);
            Vec::new()
        });
        let projects = self.projects.list_featured().await.unwrap_or_else(|e| {
            tracing::error!("Failed to load featured projects for sitemap: {}", e);
            Vec::new()
        });
        render(&self.base_url, Utc::now().date_naive(), &posts, &projects)
    }

    pub async fn stats(&self) -> Result<SitemapStats, ContentError> {
        let (blog_posts, featured_projects, active_sheds) = futures::try_join!(
            self.posts.count_published(),
            self.projects.count_featured(),
            self.sheds.count_active(),
        )?;
        Ok(SitemapStats {
            total_urls: STATIC_ROUTES.len() as i64 + blog_posts + featured_projects + active_sheds,
            blog_posts,
            featured_projects,
            active_sheds,
        })
    }

    /// Notify every configured search engine concurrently. A request that
    /// completes counts as submitted whatever its HTTP status.
    pub async fn ping(&self, sitemap_url: &str) -> Vec<PingResult> {
        if !self.config.ping_enabled {
            tracing::info!("Sitemap ping disabled, skipping submission");
            return Vec::new();
        }

        let encoded = urlencoding::encode(sitemap_url);
        let requests = self
            .config
            .ping_endpoints
            .iter()
            .map(|endpoint| self.ping_one(endpoint, &encoded));
        join_all(requests).await
    }

    async fn ping_one(&self, endpoint: &PingEndpoint, encoded: &str) -> PingResult {
        let url = format!("{}{}", endpoint.url, encoded);
        let success = match self.client.get(&url).send().await {
            Ok(response) => {
                tracing::info!("Sitemap ping to {} returned {}", endpoint.engine, response.status());
                true
            }
            Err(e) => {
                tracing::warn!("Sitemap ping to {} failed: {}", endpoint.engine, e);
                false
            }
        };
        PingResult {
            engine: endpoint.engine.clone(),
            success,
            status: if success { "Submitted" } else { "Failed" }.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::repositories::{SqlxBlogPostRepository, SqlxProjectRepository, SqlxShedRepository};
    use crate::db::{create_test_pool, migrations, DbPool};
    use crate::models::{BlogPostFields, ProjectInput, ShedInput};
    use chrono::TimeZone;

    fn post(slug: &str) -> BlogPost {
        let at = Utc.with_ymd_and_hms(2024, 3, 5, 12, 0, 0).unwrap();
        BlogPost {
            id: 1,
            title: slug.to_string(),
            slug: slug.to_string(),
            excerpt: String::new(),
            content: String::new(),
            content_html: String::new(),
            featured_image: String::new(),
            author: "Sam".to_string(),
            is_published: true,
            published_at: Some(at),
            created_at: at,
            updated_at: at,
        }
    }

    #[test]
    fn test_render_static_routes_and_posts() {
        let today = NaiveDate::from_ymd_opt(2024, 6, 1).unwrap();
        let xml = render(
            "https://sheds.example.com/",
            today,
            &[post("first-post"), post("a&b")],
            &[],
        );

        assert_eq!(xml.matches("<url>").count(), 5);
        assert!(xml.contains("<urlset xmlns=\"http://www.sitemaps.org/schemas/sitemap/0.9\">"));
        assert!(xml.contains("<loc>https://sheds.example.com/</loc>"));
        assert!(xml.contains("<loc>https://sheds.example.com/sheds</loc>"));
        assert!(xml.contains("<changefreq>daily</changefreq>"));
        assert!(xml.contains("<priority>1.0</priority>"));
        assert!(xml.contains("<lastmod>2024-06-01</lastmod>"));
        assert!(xml.contains("<loc>https://sheds.example.com/blog/first-post</loc>"));
        assert!(xml.contains("<lastmod>2024-03-05</lastmod>"));
        assert!(xml.contains("<loc>https://sheds.example.com/blog/a&amp;b</loc>"));
    }

    #[test]
    fn test_escape_xml() {
        assert_eq!(escape_xml("<a href='x'>\"&\"</a>"), "&lt;a href=&apos;x&apos;&gt;&quot;&amp;&quot;&lt;/a&gt;");
    }

    async fn pool() -> DbPool {
        let pool = create_test_pool().await.unwrap();
        migrations::run_migrations(&pool).await.unwrap();
        pool
    }

    fn service(pool: DbPool, config: SitemapConfig) -> SitemapService {
        SitemapService::new(
            SqlxBlogPostRepository::boxed(pool.clone()),
            SqlxProjectRepository::boxed(pool.clone()),
            SqlxShedRepository::boxed(pool),
            "https://sheds.example.com",
            config,
        )
    }

    #[tokio::test]
    async fn test_generate_and_stats() {
        let pool = pool().await;
        let posts = SqlxBlogPostRepository::new(pool.clone());
        let fields = |slug: &str, published: bool| BlogPostFields {
            title: slug.to_string(),
            slug: slug.to_string(),
            excerpt: String::new(),
            content: "Some long enough content".to_string(),
            content_html: String::new(),
            featured_image: String::new(),
            author: "Sam".to_string(),
            is_published: published,
            published_at: published.then(Utc::now),
        };
        posts.create(&fields("live", true)).await.unwrap();
        posts.create(&fields("draft", false)).await.unwrap();

        SqlxProjectRepository::new(pool.clone())
            .create(&ProjectInput {
                title: "Barn".to_string(),
                project_type: "Barn".to_string(),
                is_featured: true,
                ..ProjectInput::default()
            })
            .await
            .unwrap();
        SqlxShedRepository::new(pool.clone())
            .create(&ShedInput {
                title: "Lofted Barn".to_string(),
                material_type: "Wood".to_string(),
                color: "Red".to_string(),
                size: "10x12".to_string(),
                shed_style: "Barn".to_string(),
                is_active: true,
                ..ShedInput::default()
            })
            .await
            .unwrap();

        let service = service(pool, SitemapConfig::default());
        let xml = service.generate().await;
        assert!(xml.contains("/blog/live</loc>"));
        assert!(!xml.contains("/blog/draft"));
        assert!(xml.contains("/projects/1</loc>"));
        assert_eq!(service.sitemap_url(), "https://sheds.example.com/sitemap.xml");

        let stats = service.stats().await.unwrap();
        assert_eq!(
            stats,
            SitemapStats {
                total_urls: 6,
                blog_posts: 1,
                featured_projects: 1,
                active_sheds: 1,
            }
        );
    }

    #[tokio::test]
    async fn test_ping_reports_each_engine() {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let app = axum::Router::new().route("/ping", axum::routing::get(|| async { "ok" }));
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        let config = SitemapConfig {
            ping_enabled: true,
            ping_endpoints: vec![
                PingEndpoint {
                    engine: "Local".to_string(),
                    url: format!("http://{}/ping?sitemap=", addr),
                },
                PingEndpoint {
                    engine: "Nowhere".to_string(),
                    url: "http://127.0.0.1:1/ping?sitemap=".to_string(),
                },
            ],
            ping_timeout_seconds: 2,
        };
        let service = service(pool().await, config);
        let results = service.ping("https://sheds.example.com/sitemap.xml").await;

        assert_eq!(results.len(), 2);
        assert_eq!(results[0].engine, "Local");
        assert!(results[0].success);
        assert_eq!(results[0].status, "Submitted");
        assert!(!results[1].success);
        assert_eq!(results[1].status, "Failed");
    }

    #[tokio::test]
    async fn test_ping_disabled() {
        let config = SitemapConfig {
            ping_enabled: false,
            ..SitemapConfig::default()
        };
        let service = service(pool().await, config);
        assert!(service.ping("https://sheds.example.com/sitemap.xml").await.is_empty());
    }
}
