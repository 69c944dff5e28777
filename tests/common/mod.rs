//! 共享测试工具和辅助函数

#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::Mutex;
use std::sync::atomic::{AtomicU32, Ordering};
use std::time::Duration;

use async_trait::async_trait;

use ecs_domain_validation::{
    DnsChallenge, DomainApi, DomainDetails, DomainRequestBody, DomainStatus, EcsError,
    FileChallenge, PollSchedule, Result, VerificationMethod,
};

/// 跳过测试的宏（当环境变量缺失时）
#[macro_export]
macro_rules! skip_if_no_credentials {
    ($($var:expr),+) => {
        $(
            if std::env::var($var).is_err() {
                eprintln!("跳过测试: 缺少环境变量 {}", $var);
                return;
            }
        )+
    };
}

/// 断言 `Result` 为 `Ok`，并解包返回内部值（失败则直接让测试失败）。
#[macro_export]
macro_rules! require_ok {
    ($expr:expr $(,)?) => {{
        let res = $expr;
        assert!(res.is_ok(), "expected Ok(..), got {res:?}");
        let Ok(val) = res else {
            return;
        };
        val
    }};
    ($expr:expr, $($msg:tt)+) => {{
        let res = $expr;
        assert!(
            res.is_ok(),
            "{}: {res:?}",
            format_args!($($msg)+)
        );
        let Ok(val) = res else {
            return;
        };
        val
    }};
}

/// 断言 `Option` 为 `Some`，并解包返回内部值（失败则直接让测试失败）。
#[macro_export]
macro_rules! require_some {
    ($expr:expr $(,)?) => {{
        let opt = $expr;
        assert!(opt.is_some(), "expected Some(..), got None");
        let Some(val) = opt else {
            return;
        };
        val
    }};
    ($expr:expr, $($msg:tt)+) => {{
        let opt = $expr;
        assert!(opt.is_some(), "{}", format_args!($($msg)+));
        let Some(val) = opt else {
            return;
        };
        val
    }};
}

/// 无延迟的轮询计划，让测试立即执行
pub fn fast_schedule() -> PollSchedule {
    PollSchedule {
        initial_delay: Duration::ZERO,
        settle_delay: Duration::ZERO,
        max_polls: 4,
    }
}

/// 脚本化的 `DomainApi` 模拟实现
///
/// `get_domain` 按顺序消费脚本中的结果；脚本耗尽后重复返回最后一个。
/// 写操作（add / reverify）记录调用参数，可注入一次性错误。
#[derive(Debug)]
pub struct MockApi {
    version: String,
    get_script: Mutex<VecDeque<Result<DomainDetails>>>,
    pub get_calls: AtomicU32,
    pub add_calls: Mutex<Vec<(u32, DomainRequestBody)>>,
    pub reverify_calls: Mutex<Vec<(u32, String, DomainRequestBody)>>,
    add_error: Mutex<Option<EcsError>>,
    reverify_error: Mutex<Option<EcsError>>,
}

impl MockApi {
    pub fn new() -> Self {
        Self {
            version: "2.0.0".to_string(),
            get_script: Mutex::new(VecDeque::new()),
            get_calls: AtomicU32::new(0),
            add_calls: Mutex::new(Vec::new()),
            reverify_calls: Mutex::new(Vec::new()),
            add_error: Mutex::new(None),
            reverify_error: Mutex::new(None),
        }
    }

    /// 追加一个 `get_domain` 脚本结果
    pub fn push_get(self, result: Result<DomainDetails>) -> Self {
        self.get_script.lock().unwrap().push_back(result);
        self
    }

    /// 让下一次 `add_domain` 返回错误
    pub fn fail_add(self, error: EcsError) -> Self {
        *self.add_error.lock().unwrap() = Some(error);
        self
    }

    /// 让下一次 `reverify_domain` 返回错误
    pub fn fail_reverify(self, error: EcsError) -> Self {
        *self.reverify_error.lock().unwrap() = Some(error);
        self
    }

    pub fn get_call_count(&self) -> u32 {
        self.get_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl DomainApi for MockApi {
    async fn get_app_version(&self) -> Result<String> {
        Ok(self.version.clone())
    }

    async fn get_domain(&self, _client_id: u32, domain: &str) -> Result<DomainDetails> {
        self.get_calls.fetch_add(1, Ordering::SeqCst);
        let mut script = self.get_script.lock().unwrap();
        if script.len() > 1 {
            script.pop_front().unwrap()
        } else if let Some(last) = script.front() {
            last.clone()
        } else {
            Err(EcsError::DomainNotFound {
                domain: domain.to_string(),
                raw_message: None,
            })
        }
    }

    async fn add_domain(&self, client_id: u32, body: &DomainRequestBody) -> Result<()> {
        self.add_calls.lock().unwrap().push((client_id, body.clone()));
        match self.add_error.lock().unwrap().take() {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }

    async fn reverify_domain(
        &self,
        client_id: u32,
        domain: &str,
        body: &DomainRequestBody,
    ) -> Result<()> {
        self.reverify_calls
            .lock()
            .unwrap()
            .push((client_id, domain.to_string(), body.clone()));
        match self.reverify_error.lock().unwrap().take() {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }
}

// ============ 域名状态构造器 ============

/// 最小化的域名状态
pub fn bare_details(status: DomainStatus, method: Option<VerificationMethod>) -> DomainDetails {
    DomainDetails {
        client_id: 1,
        status,
        verification_method: method,
        ov_eligible: None,
        ov_expiry: None,
        ev_eligible: None,
        ev_expiry: None,
        dns_method: None,
        web_server_method: None,
        email_method: None,
    }
}

/// 带 DNS 挑战值的域名状态
pub fn dns_details(status: DomainStatus, record_value: &str) -> DomainDetails {
    let mut details = bare_details(status, Some(VerificationMethod::Dns));
    details.dns_method = Some(DnsChallenge {
        record_domain: "_pki-validation.example.com".to_string(),
        record_type: "TXT".to_string(),
        record_value: record_value.to_string(),
    });
    details
}

/// 带文件挑战的域名状态
pub fn web_server_details(status: DomainStatus, file_contents: &str) -> DomainDetails {
    let mut details = bare_details(status, Some(VerificationMethod::WebServer));
    details.web_server_method = Some(FileChallenge {
        file_location: "http://example.com/.well-known/pki-validation/fileauth.txt".to_string(),
        file_contents: file_contents.to_string(),
    });
    details
}

/// 带验证邮件地址的域名状态
pub fn email_details(status: DomainStatus, emails: &[&str]) -> DomainDetails {
    let mut details = bare_details(status, Some(VerificationMethod::Email));
    details.email_method = Some(emails.iter().map(|s| (*s).to_string()).collect());
    details
}
