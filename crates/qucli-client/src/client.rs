//! Quay REST API client.
//!
//! Each public method performs one authenticated exchange (listing follows
//! pagination) and decodes the JSON answer into a `qucli-core` model.

use std::collections::BTreeMap;

use qucli_core::{
    CreateNotificationRequest, CreateRepositoryRequest, Notification, Permission, PrincipalKind,
    Repository, RepositoryRef, Role, SetPermissionRequest,
};
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION};
use reqwest::{Method, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use tracing::{debug, info};
use url::Url;

use crate::config::QuayConfig;
use crate::error::ClientError;

/// Page of `GET /repository`.
#[derive(Debug, Deserialize)]
struct RepositoryPage {
    #[serde(default)]
    repositories: Vec<Repository>,
    #[serde(default)]
    next_page: Option<String>,
}

/// Body of `GET .../permissions/{kind}/`, keyed by principal name.
#[derive(Debug, Deserialize)]
struct PermissionMap {
    #[serde(default)]
    permissions: BTreeMap<String, Permission>,
}

/// Body of `GET .../notification/`.
#[derive(Debug, Deserialize)]
struct NotificationList {
    #[serde(default)]
    notifications: Vec<Notification>,
}

/// Client for the Quay.io REST API.
#[derive(Debug)]
pub struct QuayClient {
    config: QuayConfig,
    base_url: Url,
    http: reqwest::Client,
}

impl QuayClient {
    /// Creates a new client with the given configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the API root is not a valid base URL or the HTTP
    /// client cannot be created.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use qucli_client::{QuayClient, QuayConfig};
    ///
    /// let config = QuayConfig::new("quay.io").with_token("token");
    /// let client = QuayClient::new(config)?;
    /// # Ok::<(), qucli_client::ClientError>(())
    /// ```
    pub fn new(config: QuayConfig) -> Result<Self, ClientError> {
        let base_url = Url::parse(&config.base_url).map_err(|e| ClientError::InvalidUrl {
            url: config.base_url.clone(),
            message: e.to_string(),
        })?;

        if base_url.cannot_be_a_base() {
            return Err(ClientError::InvalidUrl {
                url: config.base_url.clone(),
                message: "not usable as an API root".to_string(),
            });
        }

        let http = reqwest::Client::builder()
            .timeout(config.timeout)
            .user_agent(&config.user_agent)
            .build()
            .map_err(|source| ClientError::Setup { source })?;

        Ok(Self {
            config,
            base_url,
            http,
        })
    }

    /// Creates a repository.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the registry rejects it.
    pub async fn create_repository(
        &self,
        request: &CreateRepositoryRequest,
    ) -> Result<Repository, ClientError> {
        let url = self.endpoint(&["repository"])?;
        let builder = self.request(Method::POST, &url)?.json(request);
        let repository: Repository = self.execute_json(builder, &url).await?;

        info!(
            namespace = %repository.namespace,
            name = %repository.name,
            visibility = %request.visibility,
            "Created repository"
        );
        Ok(repository)
    }

    /// Fetches a single repository.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the repository does not exist.
    pub async fn get_repository(
        &self,
        repository: &RepositoryRef,
    ) -> Result<Repository, ClientError> {
        let url = self.repository_endpoint(repository, &[])?;
        self.execute_json(self.request(Method::GET, &url)?, &url)
            .await
    }

    /// Lists the repositories of a namespace, following every page.
    ///
    /// With `public` set, public repositories the caller has no explicit
    /// permission on are included too.
    ///
    /// # Errors
    ///
    /// Returns an error if any page cannot be fetched.
    pub async fn list_repositories(
        &self,
        namespace: &str,
        public: bool,
    ) -> Result<Vec<Repository>, ClientError> {
        let mut repositories = Vec::new();
        let mut next_page: Option<String> = None;

        loop {
            let mut url = self.endpoint(&["repository"])?;
            {
                let mut query = url.query_pairs_mut();
                query
                    .append_pair("namespace", namespace)
                    .append_pair("public", &public.to_string());
                if let Some(page) = &next_page {
                    query.append_pair("next_page", page);
                }
            }

            let page: RepositoryPage = self
                .execute_json(self.request(Method::GET, &url)?, &url)
                .await?;
            repositories.extend(page.repositories);

            match page.next_page {
                Some(token) if !token.is_empty() => next_page = Some(token),
                _ => break,
            }
        }

        debug!(namespace, count = repositories.len(), "Listed repositories");
        Ok(repositories)
    }

    /// Deletes a repository.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the registry rejects it.
    pub async fn delete_repository(&self, repository: &RepositoryRef) -> Result<(), ClientError> {
        let url = self.repository_endpoint(repository, &[])?;
        self.execute(self.request(Method::DELETE, &url)?, &url)
            .await?;

        info!(%repository, "Deleted repository");
        Ok(())
    }

    /// Lists the user or team permissions of a repository, sorted by name.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the body cannot be decoded.
    pub async fn list_permissions(
        &self,
        repository: &RepositoryRef,
        kind: PrincipalKind,
    ) -> Result<Vec<Permission>, ClientError> {
        let url = self.repository_endpoint(repository, &["permissions", kind.as_str(), ""])?;
        let map: PermissionMap = self
            .execute_json(self.request(Method::GET, &url)?, &url)
            .await?;
        Ok(map.permissions.into_values().collect())
    }

    /// Grants `role` to a user or team, replacing any existing role.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the registry rejects it.
    pub async fn add_permission(
        &self,
        repository: &RepositoryRef,
        kind: PrincipalKind,
        principal: &str,
        role: Role,
    ) -> Result<Permission, ClientError> {
        let url =
            self.repository_endpoint(repository, &["permissions", kind.as_str(), principal])?;
        let builder = self
            .request(Method::PUT, &url)?
            .json(&SetPermissionRequest { role });
        let permission: Permission = self.execute_json(builder, &url).await?;

        info!(%repository, %kind, principal, %role, "Granted permission");
        Ok(permission)
    }

    /// Revokes the permission of a user or team.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the registry rejects it.
    pub async fn delete_permission(
        &self,
        repository: &RepositoryRef,
        kind: PrincipalKind,
        principal: &str,
    ) -> Result<(), ClientError> {
        let url =
            self.repository_endpoint(repository, &["permissions", kind.as_str(), principal])?;
        self.execute(self.request(Method::DELETE, &url)?, &url)
            .await?;

        info!(%repository, %kind, principal, "Revoked permission");
        Ok(())
    }

    /// Lists the notifications of a repository.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the body cannot be decoded.
    pub async fn list_notifications(
        &self,
        repository: &RepositoryRef,
    ) -> Result<Vec<Notification>, ClientError> {
        let url = self.repository_endpoint(repository, &["notification", ""])?;
        let list: NotificationList = self
            .execute_json(self.request(Method::GET, &url)?, &url)
            .await?;
        Ok(list.notifications)
    }

    /// Adds a notification to a repository.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the registry rejects it.
    pub async fn add_notification(
        &self,
        repository: &RepositoryRef,
        request: &CreateNotificationRequest,
    ) -> Result<Notification, ClientError> {
        let url = self.repository_endpoint(repository, &["notification", ""])?;
        let builder = self.request(Method::POST, &url)?.json(request);
        let notification: Notification = self.execute_json(builder, &url).await?;

        info!(
            %repository,
            uuid = %notification.uuid,
            event = %notification.event,
            method = %notification.method,
            "Added notification"
        );
        Ok(notification)
    }

    /// Deletes a notification.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the registry rejects it.
    pub async fn delete_notification(
        &self,
        repository: &RepositoryRef,
        uuid: &str,
    ) -> Result<(), ClientError> {
        let url = self.repository_endpoint(repository, &["notification", uuid])?;
        self.execute(self.request(Method::DELETE, &url)?, &url)
            .await?;

        info!(%repository, uuid, "Deleted notification");
        Ok(())
    }

    /// Asks the registry to deliver a test payload for a notification.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the registry rejects it.
    pub async fn test_notification(
        &self,
        repository: &RepositoryRef,
        uuid: &str,
    ) -> Result<(), ClientError> {
        let url = self.repository_endpoint(repository, &["notification", uuid, "test"])?;
        self.execute(self.request(Method::POST, &url)?, &url)
            .await?;

        info!(%repository, uuid, "Queued test notification");
        Ok(())
    }

    /// Joins path segments onto the API root, percent-encoding each one.
    ///
    /// A trailing `""` segment yields a trailing slash.
    fn endpoint(&self, segments: &[&str]) -> Result<Url, ClientError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| ClientError::InvalidUrl {
                url: self.config.base_url.clone(),
                message: "not usable as an API root".to_string(),
            })?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    fn repository_endpoint(
        &self,
        repository: &RepositoryRef,
        rest: &[&str],
    ) -> Result<Url, ClientError> {
        let mut segments = vec![
            "repository",
            repository.namespace.as_str(),
            repository.name.as_str(),
        ];
        segments.extend_from_slice(rest);
        self.endpoint(&segments)
    }

    fn request(&self, method: Method, url: &Url) -> Result<RequestBuilder, ClientError> {
        debug!(method = method.as_str(), %url, "Sending request");
        Ok(self
            .http
            .request(method, url.clone())
            .headers(self.auth_headers()?))
    }

    /// Sends a request and maps non-2xx answers to [`ClientError::Status`].
    async fn execute(&self, builder: RequestBuilder, url: &Url) -> Result<Response, ClientError> {
        let response = builder.send().await.map_err(|source| ClientError::Network {
            url: url.to_string(),
            source,
        })?;

        let status = response.status();
        debug!(%url, status = status.as_u16(), "Received response");

        if !status.is_success() {
            return Err(ClientError::Status {
                url: url.to_string(),
                status: status.as_u16(),
                message: response.text().await.unwrap_or_default(),
            });
        }

        Ok(response)
    }

    async fn execute_json<T: DeserializeOwned>(
        &self,
        builder: RequestBuilder,
        url: &Url,
    ) -> Result<T, ClientError> {
        let response = self.execute(builder, url).await?;
        let body = response.text().await.map_err(|source| ClientError::Network {
            url: url.to_string(),
            source,
        })?;

        serde_json::from_str(&body).map_err(|source| ClientError::Decode {
            url: url.to_string(),
            source,
        })
    }

    /// Creates the headers sent with every request.
    fn auth_headers(&self) -> Result<HeaderMap, ClientError> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        if let Some(token) = &self.config.token {
            let mut value = HeaderValue::from_str(&format!("Bearer {token}"))
                .map_err(|_| ClientError::InvalidToken)?;
            value.set_sensitive(true);
            headers.insert(AUTHORIZATION, value);
        }

        Ok(headers)
    }
}
