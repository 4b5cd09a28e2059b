use crate::domain::models::{
    Collection, Service, Stack, HEALTH_HEALTHY, STATE_ACTIVE, STATE_UPGRADED,
};
use crate::services::credentials::Credentials;
use crate::services::payloads;
use crate::services::settings::ClientSettings;
use reqwest::blocking::{Client, RequestBuilder};
use reqwest::Method;
use serde::de::DeserializeOwned;
use serde_json::{json, Map, Value};
use std::collections::BTreeMap;
use std::time::{Duration, Instant};
use tracing::{debug, info};

#[derive(thiserror::Error, Debug)]
pub enum CattleError {
    #[error("timed out waiting for service {service} to become {wanted}")]
    Timeout {
        service: String,
        wanted: &'static str,
    },
    #[error("service not found: {0}")]
    ServiceNotFound(String),
    #[error("stack not found: {0}")]
    StackNotFound(String),
    #[error("port rule with source_port {source_port} and path {path:?} not found")]
    PortRuleNotFound {
        source_port: u16,
        path: Option<String>,
    },
    #[error("unknown sidekick launch config: {0}")]
    UnknownSidekick(String),
    #[error("{resource} has no {link:?} link")]
    MissingLink { resource: String, link: &'static str },
    #[error("service {0} is not a load balancer")]
    NotLoadBalancer(String),
    #[error("cattle request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("unexpected cattle payload: {0}")]
    Decode(#[source] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, CattleError>;

/// Blocking client for the Cattle `v2-beta` API of one Rancher server.
pub struct CattleClient {
    http: Client,
    base: String,
    access_key: String,
    secret_key: String,
    poll_interval: Duration,
}

impl CattleClient {
    pub fn new(creds: &Credentials, settings: &ClientSettings) -> Result<Self> {
        let http = Client::builder().timeout(settings.timeout()).build()?;
        Ok(CattleClient {
            http,
            base: creds.url.clone(),
            access_key: creds.access_key.clone(),
            secret_key: creds.secret_key.clone(),
            poll_interval: settings.poll_interval(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base
    }

    fn project_url(&self, project_id: &str, rest: &str) -> String {
        format!("{}projects/{}/{}", self.base, project_id, rest)
    }

    fn service_url(&self, project_id: &str, service_id: &str) -> String {
        self.project_url(project_id, &format!("services/{}", service_id))
    }

    fn request(&self, method: Method, url: &str) -> RequestBuilder {
        debug!(%method, url, "cattle request");
        self.http
            .request(method, url)
            .basic_auth(&self.access_key, Some(&self.secret_key))
    }

    fn send<T: DeserializeOwned>(&self, req: RequestBuilder) -> Result<T> {
        let resp = req.send()?.error_for_status()?;
        let body: Value = resp.json()?;
        serde_json::from_value(body).map_err(CattleError::Decode)
    }

    fn action(&self, svc: &Service, action: &str, body: Option<&Value>) -> Result<Service> {
        let (project_id, service_id) = svc.ids();
        let mut req = self
            .request(Method::POST, &self.service_url(project_id, service_id))
            .query(&[("action", action)]);
        if let Some(b) = body {
            req = req.json(b);
        }
        info!(service = %svc.id, action, "service action");
        self.send(req)
    }

    pub fn get_svc(&self, project_id: &str, service_id: &str) -> Result<Service> {
        self.send(self.request(Method::GET, &self.service_url(project_id, service_id)))
    }

    pub fn get_stack_by_name(&self, project_id: &str, name: &str) -> Result<Stack> {
        let req = self
            .request(Method::GET, &self.project_url(project_id, "stacks"))
            .query(&[("name", name)]);
        let stacks: Collection<Stack> = self.send(req)?;
        stacks
            .data
            .into_iter()
            .find(|s| s.name == name)
            .ok_or_else(|| CattleError::StackNotFound(name.to_string()))
    }

    pub fn get_svc_by_stack_and_name(&self, stack: &Stack, name: &str) -> Result<Service> {
        let url = stack
            .links
            .get("services")
            .ok_or_else(|| CattleError::MissingLink {
                resource: format!("stack {}", stack.id),
                link: "services",
            })?;
        let req = self.request(Method::GET, url).query(&[("name", name)]);
        let services: Collection<Service> = self.send(req)?;
        services
            .data
            .into_iter()
            .find(|s| s.name == name)
            .ok_or_else(|| CattleError::ServiceNotFound(name.to_string()))
    }

    fn self_link<'a>(&self, svc: &'a Service) -> Result<&'a str> {
        svc.link("self").ok_or_else(|| CattleError::MissingLink {
            resource: format!("service {}", svc.id),
            link: "self",
        })
    }

    pub fn rename_svc(&self, svc: &Service, new_name: &str) -> Result<Service> {
        let req = self
            .request(Method::PUT, self.self_link(svc)?)
            .json(&payloads::rename_body(new_name));
        info!(service = %svc.id, new_name, "renaming service");
        self.send(req)
    }

    pub fn refresh_svc(&self, svc: &Service) -> Result<Service> {
        let (project_id, service_id) = svc.ids();
        self.get_svc(project_id, service_id)
    }

    pub fn await_active(&self, svc: Service, timeout: Option<Duration>) -> Result<Service> {
        poll_until(
            svc,
            timeout,
            self.poll_interval,
            STATE_ACTIVE,
            |s| s.state == STATE_ACTIVE,
            |s| self.refresh_svc(s),
        )
    }

    pub fn await_healthy(&self, svc: Service, timeout: Option<Duration>) -> Result<Service> {
        poll_until(
            svc,
            timeout,
            self.poll_interval,
            HEALTH_HEALTHY,
            |s| s.health_state.as_deref() == Some(HEALTH_HEALTHY),
            |s| self.refresh_svc(s),
        )
    }

    pub fn get_lb_svc_target(
        &self,
        lb_svc: &Service,
        source_port: u16,
        path: Option<&str>,
    ) -> Result<Service> {
        let rule = lb_svc
            .lb_config
            .as_ref()
            .and_then(|lb| lb.port_rules.iter().find(|pr| pr.matches(source_port, path)))
            .ok_or_else(|| {
                CattleError::ServiceNotFound(format!(
                    "no target for port {} path {:?} on {}",
                    source_port, path, lb_svc.id
                ))
            })?;
        let target = rule.service_id.as_deref().ok_or_else(|| {
            CattleError::ServiceNotFound(format!(
                "port {} path {:?} on {} routes by selector",
                source_port, path, lb_svc.id
            ))
        })?;
        self.get_svc(&lb_svc.account_id, target)
    }

    pub fn change_lb_svc_target(
        &self,
        lb_svc: &Service,
        source_port: u16,
        path: Option<&str>,
        target_svc_id: &str,
    ) -> Result<Service> {
        let lb_config = lb_svc
            .lb_config
            .as_ref()
            .ok_or_else(|| CattleError::NotLoadBalancer(lb_svc.id.clone()))?;
        let lb_config = payloads::retarget_lb_config(lb_config, source_port, path, target_svc_id)?;
        let req = self
            .request(Method::PUT, self.self_link(lb_svc)?)
            .json(&json!({ "lbConfig": lb_config }));
        info!(lb = %lb_svc.id, source_port, ?path, target = target_svc_id, "retargeting port rule");
        self.send(req)
    }

    pub fn finish_any_previous_upgrade(&self, svc: Service) -> Result<Service> {
        if svc.state != STATE_UPGRADED {
            return Ok(svc);
        }
        self.action(&svc, "finishupgrade", None)
    }

    pub fn create_svc(
        &self,
        project_id: &str,
        stack_id: &str,
        name: &str,
        image_name: &str,
        config: Option<&Map<String, Value>>,
        launch_config: Option<&Map<String, Value>>,
    ) -> Result<Service> {
        let body = payloads::create_body(stack_id, name, image_name, config, launch_config);
        info!(project_id, stack_id, name, image_name, "creating service");
        self.send(
            self.request(Method::POST, &self.project_url(project_id, "services"))
                .json(&body),
        )
    }

    pub fn clone_svc(
        &self,
        svc: &Service,
        new_name: &str,
        new_image: Option<&str>,
        config: Option<&Map<String, Value>>,
        launch_config: Option<&Map<String, Value>>,
    ) -> Result<Service> {
        let body = payloads::clone_body(svc, new_name, new_image, config, launch_config)?;
        info!(source = %svc.id, new_name, "cloning service");
        self.send(
            self.request(Method::POST, &self.project_url(&svc.account_id, "services"))
                .json(&body),
        )
    }

    pub fn upgrade_svc_images(
        &self,
        svc: Service,
        new_image: Option<&str>,
        new_secondary_images: Option<&BTreeMap<String, String>>,
    ) -> Result<Service> {
        let svc = self.finish_any_previous_upgrade(svc)?;
        let svc = self.await_active(svc, None)?;
        let body = payloads::upgrade_body(&svc, new_image, new_secondary_images)?;
        self.action(&svc, "upgrade", Some(&body))
    }

    pub fn restart_svc(&self, svc: &Service, batch_size: u32, interval_ms: u64) -> Result<Service> {
        self.action(
            svc,
            "restart",
            Some(&payloads::restart_body(batch_size, interval_ms)),
        )
    }
}

/// Re-reads `svc` every `interval` until `done` holds. Without a timeout, or
/// with one too large to represent as an `Instant`, this waits forever.
pub fn poll_until(
    mut svc: Service,
    timeout: Option<Duration>,
    interval: Duration,
    wanted: &'static str,
    done: impl Fn(&Service) -> bool,
    mut refresh: impl FnMut(&Service) -> Result<Service>,
) -> Result<Service> {
    let deadline = timeout.and_then(|t| Instant::now().checked_add(t));
    while !done(&svc) {
        if deadline.is_some_and(|d| Instant::now() >= d) {
            return Err(CattleError::Timeout {
                service: svc.id.clone(),
                wanted,
            });
        }
        std::thread::sleep(interval);
        svc = refresh(&svc)?;
        debug!(service = %svc.id, state = %svc.state, health = ?svc.health_state, "polled");
    }
    Ok(svc)
}
