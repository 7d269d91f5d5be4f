//! Building a [`CatalogIndex`] from the exported `.dat` files.

use crate::error::{CatalogError, Result};
use crate::parser;
use crate::types::*;
use std::collections::HashSet;
use std::path::Path;
use tracing::{info, warn};

impl CatalogIndex {
    /// Load the catalog from a directory containing `courses.dat`,
    /// `instructors.dat` and `departments.dat`.
    ///
    /// The three files are parsed in parallel. Duplicate ids within a file
    /// are rejected; references from a course to an instructor or department
    /// that does not exist are tolerated (the join leaves those fields
    /// empty) and only logged.
    pub fn load_from_files(data_dir: &Path) -> Result<Self> {
        info!("Loading course catalog from {}", data_dir.display());

        let courses_path = data_dir.join("courses.dat");
        let instructors_path = data_dir.join("instructors.dat");
        let departments_path = data_dir.join("departments.dat");

        let ((instructors, departments), courses) = rayon::join(
            || {
                rayon::join(
                    || parser::parse_instructors(&instructors_path),
                    || parser::parse_departments(&departments_path),
                )
            },
            || parser::parse_courses(&courses_path),
        );

        let instructors = instructors?;
        let departments = departments?;
        let courses = courses?;

        info!(
            "Parsed {} courses, {} instructors, {} departments",
            courses.len(),
            instructors.len(),
            departments.len()
        );

        let mut index = CatalogIndex::new();

        ensure_unique("instructor", instructors.iter().map(|i| i.id))?;
        for instructor in instructors {
            index.insert_instructor(instructor);
        }

        ensure_unique("department", departments.iter().map(|d| d.id))?;
        for department in departments {
            index.insert_department(department);
        }

        ensure_unique("course", courses.iter().map(|c| c.id))?;
        for course in courses {
            index.insert_course(course);
        }

        let dangling = index.dangling_references();
        if dangling > 0 {
            warn!(
                "{} course references point at missing instructors or departments",
                dangling
            );
        }

        Ok(index)
    }

    /// Count course references to instructors or departments that are not
    /// present in the catalog.
    pub fn dangling_references(&self) -> usize {
        self.courses
            .values()
            .map(|course| {
                let missing_instructor = course
                    .instructor_id
                    .is_some_and(|id| !self.instructors.contains_key(&id));
                let missing_department = course
                    .department_id
                    .is_some_and(|id| !self.departments.contains_key(&id));
                usize::from(missing_instructor) + usize::from(missing_department)
            })
            .sum()
    }
}

fn ensure_unique(entity: &str, ids: impl Iterator<Item = u32>) -> Result<()> {
    let mut seen = HashSet::new();
    for id in ids {
        if !seen.insert(id) {
            return Err(CatalogError::DuplicateId {
                entity: entity.to_string(),
                id,
            });
        }
    }
    Ok(())
}
