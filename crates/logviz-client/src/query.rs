//! Query documents sent to the endpoint.
//!
//! Identifiers never appear in the document text; they travel as variables.

use serde::Serialize;
use serde_json::Value;

/// A named query document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QueryDocument {
    pub operation_name: &'static str,
    pub text: &'static str,
}

/// Sample page plus the run's sample count, in one round trip.
pub const SAMPLE_PAGE: QueryDocument = QueryDocument {
    operation_name: "SamplePage",
    text: "query SamplePage($run_id: String!, $page_id: Int!) {
  sample_page(run_id: $run_id, page_id: $page_id) {
    run_id
    sample_id
    sample_metrics { data }
    sampling_events {
      event_id
      data {
        prompt { role content name }
        sampled
      }
    }
  }
  metadata(run_id: $run_id) { num_samples }
}",
};

pub const FINAL_REPORT: QueryDocument = QueryDocument {
    operation_name: "FinalReport",
    text: "query FinalReport($run_id: String!) {
  final_report(run_id: $run_id) { data }
}",
};

pub const SPEC: QueryDocument = QueryDocument {
    operation_name: "Spec",
    text: "query Spec($run_id: String!) {
  spec(run_id: $run_id) { completion_fns base_eval split created_at }
}",
};

pub const METADATA: QueryDocument = QueryDocument {
    operation_name: "Metadata",
    text: "query Metadata($run_id: String!) {
  metadata(run_id: $run_id) {
    run_id name uploaded_at completion_fns eval_name base_eval split created_at num_samples
  }
}",
};

pub const METADATA_LIST: QueryDocument = QueryDocument {
    operation_name: "MetadataList",
    text: "query MetadataList {
  metadata_list {
    run_id name uploaded_at completion_fns eval_name base_eval split created_at num_samples
  }
}",
};

/// Request body: `{"operationName", "query", "variables"}`.
#[derive(Debug, Serialize)]
pub(crate) struct QueryRequest<'a> {
    #[serde(rename = "operationName")]
    pub operation_name: &'a str,
    pub query: &'a str,
    pub variables: Value,
}

impl QueryDocument {
    pub(crate) fn request(&self, variables: Value) -> QueryRequest<'static> {
        QueryRequest {
            operation_name: self.operation_name,
            query: self.text,
            variables,
        }
    }
}
