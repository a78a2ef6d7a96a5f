use std::collections::HashMap;
use std::sync::{Arc, Mutex, mpsc};
use std::thread;
use std::time::Duration;

use serde::de::DeserializeOwned;
use serde_json::Value;

use critica::api::{
    Article, ArticleData, ArticleDataNewProps, ArticleDataViewProps, ArticleDataViewPublicProps,
    ArticleNewProps, ArticleSection, ArticleSectionNewProps, ArticleSectionViewProps,
    ArticleSectionViewPublicProps, ArticleViewProps, ErrorCode, Info,
};

/// In-memory Critica backend. Every article data or section write is a new
/// row; "recent" reads return the newest row per article.
#[derive(Debug, Default)]
pub struct Store {
    pub api_keys: HashMap<String, i64>,
    pub article_data: Vec<ArticleData>,
    pub sections: Vec<ArticleSection>,
    clock: i64,
    next_id: i64,
}

#[allow(dead_code)]
impl Store {
    fn tick(&mut self) -> (i64, i64) {
        self.clock += 1_000;
        self.next_id += 1;
        (self.next_id, 1_700_000_000_000 + self.clock)
    }

    pub fn add_api_key(&mut self, key: &str, user_id: i64) {
        self.api_keys.insert(key.to_owned(), user_id);
    }

    fn article(&self, article_id: i64) -> Option<Article> {
        self.article_data
            .iter()
            .find(|d| d.article.article_id == article_id)
            .map(|d| d.article.clone())
    }

    /// Seeds an article plus `(position, variant, text)` sections and returns
    /// its id.
    pub fn seed_article(
        &mut self,
        creator_user_id: i64,
        title: &str,
        duration_estimate: i64,
        sections: &[(i64, i64, &str)],
    ) -> i64 {
        let article = self.new_article(creator_user_id);
        let article_id = article.article_id;
        self.push_data(article, title, duration_estimate, true);
        for (position, variant, text) in sections {
            self.push_section(article_id, creator_user_id, *position, *variant, text, true);
        }
        article_id
    }

    pub fn set_active(&mut self, article_id: i64, active: bool) {
        let Some(current) = self.recent_data().into_iter().find(|d| d.article.article_id == article_id) else {
            return;
        };
        self.push_data(
            current.article,
            &current.title,
            current.duration_estimate,
            active,
        );
    }

    fn new_article(&mut self, creator_user_id: i64) -> Article {
        let (article_id, creation_time) = self.tick();
        Article {
            article_id,
            creation_time,
            creator_user_id,
        }
    }

    fn push_data(
        &mut self,
        article: Article,
        title: &str,
        duration_estimate: i64,
        active: bool,
    ) -> ArticleData {
        let (article_data_id, creation_time) = self.tick();
        let data = ArticleData {
            article_data_id,
            creation_time,
            creator_user_id: article.creator_user_id,
            article,
            title: title.to_owned(),
            duration_estimate,
            active,
        };
        self.article_data.push(data.clone());
        data
    }

    fn push_section(
        &mut self,
        article_id: i64,
        creator_user_id: i64,
        position: i64,
        variant: i64,
        text: &str,
        active: bool,
    ) -> Option<ArticleSection> {
        let article = self.article(article_id)?;
        let (article_section_id, creation_time) = self.tick();
        let section = ArticleSection {
            article_section_id,
            creation_time,
            creator_user_id,
            article,
            position,
            variant,
            section_text: text.to_owned(),
            active,
        };
        self.sections.push(section.clone());
        Some(section)
    }

    pub fn recent_data(&self) -> Vec<ArticleData> {
        let mut newest: HashMap<i64, &ArticleData> = HashMap::new();
        for data in &self.article_data {
            let slot = newest.entry(data.article.article_id).or_insert(data);
            if data.article_data_id > slot.article_data_id {
                *slot = data;
            }
        }
        let mut out = newest.into_values().cloned().collect::<Vec<_>>();
        out.sort_by_key(|d| d.article_data_id);
        out
    }

    fn user_for(&self, api_key: &str) -> Result<i64, ErrorCode> {
        self.api_keys
            .get(api_key)
            .copied()
            .ok_or(ErrorCode::Unauthorized)
    }

    fn handle(&mut self, path: &str, body: &str) -> Result<Value, ErrorCode> {
        match path {
            "info" => to_value(Info {
                service: "critica".to_owned(),
                version_major: 0,
                version_minor: 1,
                version_rev: 0,
                app_pub_origin: "http://localhost:3000".to_owned(),
                auth_service_external_url: "http://localhost:8079".to_owned(),
                auth_pub_api_href: "http://localhost:8079/public".to_owned(),
                auth_authenticator_href: "http://localhost:3000/auth".to_owned(),
            }),
            "article/new" => {
                let props: ArticleNewProps = parse(body)?;
                let user_id = self.user_for(&props.api_key)?;
                if props.duration_estimate <= 0 {
                    return Err(ErrorCode::InvalidDuration);
                }
                let article = self.new_article(user_id);
                to_value(self.push_data(article, &props.title, props.duration_estimate, true))
            }
            "article_data/new" => {
                let props: ArticleDataNewProps = parse(body)?;
                let user_id = self.user_for(&props.api_key)?;
                let article = self
                    .article(props.article_id)
                    .ok_or(ErrorCode::ArticleNonexistent)?;
                if article.creator_user_id != user_id {
                    return Err(ErrorCode::Unauthorized);
                }
                to_value(self.push_data(
                    article,
                    &props.title,
                    props.duration_estimate,
                    props.active,
                ))
            }
            "article_section/new" => {
                let props: ArticleSectionNewProps = parse(body)?;
                let user_id = self.user_for(&props.api_key)?;
                let section = self
                    .push_section(
                        props.article_id,
                        user_id,
                        props.position,
                        props.variant,
                        &props.section_text,
                        props.active,
                    )
                    .ok_or(ErrorCode::ArticleNonexistent)?;
                to_value(section)
            }
            "article/view" => {
                let props: ArticleViewProps = parse(body)?;
                self.user_for(&props.api_key)?;
                let articles = self
                    .recent_data()
                    .into_iter()
                    .map(|d| d.article)
                    .filter(|a| contains(&props.article_id, a.article_id))
                    .filter(|a| contains(&props.creator_user_id, a.creator_user_id))
                    .collect::<Vec<_>>();
                to_value(articles)
            }
            "article_data/view" => {
                let props: ArticleDataViewProps = parse(body)?;
                self.user_for(&props.api_key)?;
                let rows = if props.only_recent {
                    self.recent_data()
                } else {
                    self.article_data.clone()
                };
                let rows = rows
                    .into_iter()
                    .filter(|d| contains(&props.creator_user_id, d.creator_user_id))
                    .filter(|d| contains(&props.article_id, d.article.article_id))
                    .collect::<Vec<_>>();
                to_value(rows)
            }
            "article_section/view" => {
                let props: ArticleSectionViewProps = parse(body)?;
                self.user_for(&props.api_key)?;
                let rows = self
                    .sections
                    .iter()
                    .filter(|s| contains(&props.article_id, s.article.article_id))
                    .cloned()
                    .collect::<Vec<_>>();
                to_value(rows)
            }
            "article_data/view_public" => {
                let props: ArticleDataViewPublicProps = parse(body)?;
                let rows = self
                    .recent_data()
                    .into_iter()
                    .filter(|d| d.active)
                    .filter(|d| contains(&props.article_id, d.article.article_id))
                    .filter(|d| {
                        props
                            .max_duration_estimate
                            .is_none_or(|max| d.duration_estimate <= max)
                    })
                    .collect::<Vec<_>>();
                to_value(rows)
            }
            "article_section/view_public" => {
                let props: ArticleSectionViewPublicProps = parse(body)?;
                let rows = self
                    .sections
                    .iter()
                    .filter(|s| s.active)
                    .filter(|s| contains(&props.article_id, s.article.article_id))
                    .cloned()
                    .collect::<Vec<_>>();
                to_value(rows)
            }
            _ => Err(ErrorCode::NotFound),
        }
    }
}

fn contains(filter: &Option<Vec<i64>>, value: i64) -> bool {
    filter.as_ref().is_none_or(|ids| ids.contains(&value))
}

fn parse<T: DeserializeOwned>(body: &str) -> Result<T, ErrorCode> {
    serde_json::from_str(body).map_err(|_| ErrorCode::DecodeError)
}

fn to_value<T: serde::Serialize>(value: T) -> Result<Value, ErrorCode> {
    serde_json::to_value(value).map_err(|_| ErrorCode::InternalServerError)
}

fn status_for(code: ErrorCode) -> u16 {
    match code {
        ErrorCode::Unauthorized => 401,
        ErrorCode::NotFound => 404,
        ErrorCode::MethodNotAllowed => 405,
        ErrorCode::InternalServerError => 500,
        _ => 400,
    }
}

pub struct CriticaStub {
    pub base_url: String,
    pub store: Arc<Mutex<Store>>,
    shutdown_tx: Option<mpsc::Sender<()>>,
    handle: Option<thread::JoinHandle<()>>,
}

#[allow(dead_code)]
impl CriticaStub {
    pub fn spawn(store: Store) -> Self {
        let server = tiny_http::Server::http("127.0.0.1:0").expect("start critica stub server");
        let addr = server.server_addr();
        let base_url = format!("http://{addr}/public/");
        let store = Arc::new(Mutex::new(store));

        let (shutdown_tx, shutdown_rx) = mpsc::channel::<()>();

        let shared = Arc::clone(&store);
        let handle = thread::spawn(move || {
            loop {
                if shutdown_rx.try_recv().is_ok() {
                    break;
                }

                let mut request = match server.recv_timeout(Duration::from_millis(50)) {
                    Ok(Some(req)) => req,
                    Ok(None) => continue,
                    Err(_) => break,
                };

                let path = request
                    .url()
                    .strip_prefix("/public/")
                    .unwrap_or_default()
                    .to_owned();

                let result = if request.method() != &tiny_http::Method::Post {
                    Err(ErrorCode::MethodNotAllowed)
                } else {
                    let mut body = String::new();
                    if request.as_reader().read_to_string(&mut body).is_err() {
                        Err(ErrorCode::BadRequest)
                    } else {
                        shared.lock().expect("stub store lock").handle(&path, &body)
                    }
                };

                let (status, body) = match result {
                    Ok(value) => (200, value),
                    Err(code) => (status_for(code), serde_json::json!(code)),
                };
                let header =
                    tiny_http::Header::from_bytes(&b"Content-Type"[..], &b"application/json"[..])
                        .expect("build header");
                let response = tiny_http::Response::from_string(body.to_string())
                    .with_status_code(status)
                    .with_header(header);
                let _ = request.respond(response);
            }
        });

        Self {
            base_url,
            store,
            shutdown_tx: Some(shutdown_tx),
            handle: Some(handle),
        }
    }

    pub fn with_store<T>(&self, f: impl FnOnce(&mut Store) -> T) -> T {
        f(&mut self.store.lock().expect("stub store lock"))
    }
}

impl Drop for CriticaStub {
    fn drop(&mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}
