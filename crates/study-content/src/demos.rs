//! Interactive demos. These live only in `demos.json`.

use chrono::Utc;
use serde::{Deserialize, Serialize};
use study_core::store::ContentStore;
use study_legacy::{DEMOS_FILE, Demo, DemoDocument};
use uuid::Uuid;

use crate::{
  ContentService,
  error::{Error, Result},
};

#[derive(Debug, Clone, Default, Serialize)]
pub struct DemoListing {
  pub demos: Vec<Demo>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub error: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct NewDemo {
  pub title:        Option<String>,
  #[serde(default)]
  pub description:  String,
  pub category_id:  Option<String>,
  pub html_content: Option<String>,
  #[serde(default)]
  pub js_content:   String,
}

impl NewDemo {
  fn into_demo(self) -> Result<Demo> {
    let missing = |field| Error::Invalid(study_core::Error::MissingField(field));
    Ok(Demo {
      id:           Uuid::new_v4().to_string(),
      title:        self.title.ok_or_else(|| missing("title"))?,
      description:  self.description,
      category_id:  self.category_id.ok_or_else(|| missing("category_id"))?,
      html_content: self.html_content.ok_or_else(|| missing("html_content"))?,
      js_content:   self.js_content,
      created_at:   Utc::now().naive_utc().format("%Y-%m-%dT%H:%M:%S%.6f").to_string(),
      extra:        Default::default(),
    })
  }
}

impl<S: ContentStore> ContentService<S> {
  /// Demos from the flat file, optionally only those in `category`.
  pub fn list_demos(&self, category: Option<&str>) -> DemoListing {
    match self.files.load::<DemoDocument>(DEMOS_FILE) {
      Ok(doc) => DemoListing {
        demos: doc
          .demos
          .into_iter()
          .filter(|d| category.is_none_or(|c| d.category_id == c))
          .collect(),
        error: None,
      },
      Err(e) => {
        tracing::error!("error reading demos: {e}");
        DemoListing { demos: Vec::new(), error: Some(e.to_string()) }
      }
    }
  }

  /// Append a demo to the flat file. Returns the new demo's id.
  pub async fn add_demo(&self, input: NewDemo) -> Result<String> {
    let demo = input.into_demo()?;
    let id = demo.id.clone();
    self
      .files
      .update(DEMOS_FILE, |doc: &mut DemoDocument| doc.demos.push(demo))
      .await?;
    tracing::info!(demo_id = %id, "added demo");
    Ok(id)
  }
}
