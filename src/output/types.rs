use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::Value;
use uuid::Uuid;

pub const SCHEMA_VERSION: &str = "harvest.v1";

#[derive(Debug, Clone, Serialize, Default)]
pub struct Meta {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration_ms: Option<u128>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub run_id: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct Envelope {
    pub schema_version: &'static str,
    pub time: DateTime<Utc>,
    pub request_id: Uuid,
    pub op: &'static str,
    pub apply: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub plan: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub meta: Option<Meta>,
}

impl Envelope {
    pub fn plan<T: Serialize>(op: &'static str, plan: &T, meta: Option<Meta>) -> Result<Self, serde_json::Error> {
        let plan_val = serde_json::to_value(plan)?;
        Ok(Envelope {
            schema_version: SCHEMA_VERSION,
            time: Utc::now(),
            request_id: Uuid::new_v4(),
            op,
            apply: false,
            plan: Some(plan_val),
            result: None,
            meta,
        })
    }

    pub fn result<T: Serialize>(op: &'static str, result: &T, meta: Option<Meta>) -> Result<Self, serde_json::Error> {
        let res_val = serde_json::to_value(result)?;
        Ok(Envelope {
            schema_version: SCHEMA_VERSION,
            time: Utc::now(),
            request_id: Uuid::new_v4(),
            op,
            apply: true,
            plan: None,
            result: Some(res_val),
            meta,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn plan_envelope_carries_crawl_plan_without_result() {
        let plan = json!({"start_url": "https://blog.example/", "start_page": 1, "existing_records": 5});
        let env = Envelope::plan("crawl", &plan, None).unwrap();
        let v = serde_json::to_value(&env).unwrap();
        assert_eq!(v["schema_version"], "harvest.v1");
        assert_eq!(v["op"], "crawl");
        assert_eq!(v["apply"], false);
        assert_eq!(v["plan"]["start_url"], "https://blog.example/");
        assert_eq!(v["plan"]["existing_records"], 5);
        assert!(v.get("result").is_none());
        assert!(v.get("meta").is_none());
        let s = serde_json::to_string(&env).unwrap();
        assert!(s.contains("\"op\":\"crawl\""));
    }

    #[test]
    fn result_envelope_is_marked_applied() {
        let result = json!({"state": "completed", "totals": {"pages": 2, "new": 3}});
        let meta = Meta { duration_ms: Some(12), run_id: None };
        let env = Envelope::result("crawl", &result, Some(meta)).unwrap();
        let v = serde_json::to_value(&env).unwrap();
        assert_eq!(v["schema_version"], SCHEMA_VERSION);
        assert_eq!(v["apply"], true);
        assert_eq!(v["result"]["totals"]["new"], 3);
        assert_eq!(v["meta"]["duration_ms"], 12);
        assert!(v["meta"].get("run_id").is_none());
        assert!(v.get("plan").is_none());
    }

    #[test]
    fn each_envelope_gets_its_own_request_id() {
        let a = Envelope::result("stats", &json!({}), None).unwrap();
        let b = Envelope::result("stats", &json!({}), None).unwrap();
        assert_ne!(a.request_id, b.request_id);
    }
}
