//! Core domain types for the course catalog.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Course identifier, shared by the scorer output and the catalog
pub type CourseId = u32;

/// Identifier of an authenticated student
pub type StudentId = u32;

/// Identifier of an instructor (a row in the platform's users table)
pub type InstructorId = u32;

/// Identifier of a department
pub type DepartmentId = u32;

/// A course row as stored in the catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Course {
    pub id: CourseId,
    pub title: String,
    pub description: Option<String>,
    pub instructor_id: Option<InstructorId>,
    pub department_id: Option<DepartmentId>,
    pub thumbnail_url: Option<String>,
}

/// An instructor, only the name fields the catalog join reads.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Instructor {
    pub id: InstructorId,
    pub first_name: String,
    pub last_name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Department {
    pub id: DepartmentId,
    pub name: String,
}

/// One row of the catalog batch lookup.
///
/// This is the shape produced by joining a course with its instructor and
/// department. Any field except `id` may be missing: the instructor or
/// department can be unset or deleted, and older rows may lack a
/// description or thumbnail.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CatalogEntry {
    pub id: Option<CourseId>,
    pub title: Option<String>,
    pub description: Option<String>,
    pub instructor_first_name: Option<String>,
    pub instructor_last_name: Option<String>,
    pub department_name: Option<String>,
    pub thumbnail_url: Option<String>,
}

/// In-memory course catalog.
///
/// Owns the course, instructor and department tables and answers batch
/// lookups by joining them on demand. Built by
/// [`CatalogIndex::load_from_files`] or populated directly through the
/// `insert_*` methods.
#[derive(Debug, Default)]
pub struct CatalogIndex {
    pub(crate) courses: HashMap<CourseId, Course>,
    pub(crate) instructors: HashMap<InstructorId, Instructor>,
    pub(crate) departments: HashMap<DepartmentId, Department>,
}

impl CatalogIndex {
    /// Create an empty catalog
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a course, replacing any course with the same id
    pub fn insert_course(&mut self, course: Course) {
        self.courses.insert(course.id, course);
    }

    pub fn insert_instructor(&mut self, instructor: Instructor) {
        self.instructors.insert(instructor.id, instructor);
    }

    pub fn insert_department(&mut self, department: Department) {
        self.departments.insert(department.id, department);
    }

    pub fn get_course(&self, id: CourseId) -> Option<&Course> {
        self.courses.get(&id)
    }

    pub fn get_instructor(&self, id: InstructorId) -> Option<&Instructor> {
        self.instructors.get(&id)
    }

    pub fn get_department(&self, id: DepartmentId) -> Option<&Department> {
        self.departments.get(&id)
    }

    /// Returns (courses, instructors, departments) counts
    pub fn counts(&self) -> (usize, usize, usize) {
        (
            self.courses.len(),
            self.instructors.len(),
            self.departments.len(),
        )
    }

    /// Join a course with its instructor and department.
    ///
    /// Returns `None` when the course does not exist. Missing instructor or
    /// department rows leave the corresponding fields empty.
    pub fn entry(&self, id: CourseId) -> Option<CatalogEntry> {
        let course = self.courses.get(&id)?;
        let instructor = course
            .instructor_id
            .and_then(|instructor_id| self.instructors.get(&instructor_id));
        let department = course
            .department_id
            .and_then(|department_id| self.departments.get(&department_id));

        Some(CatalogEntry {
            id: Some(course.id),
            title: Some(course.title.clone()),
            description: course.description.clone(),
            instructor_first_name: instructor.map(|i| i.first_name.clone()),
            instructor_last_name: instructor.map(|i| i.last_name.clone()),
            department_name: department.map(|d| d.name.clone()),
            thumbnail_url: course.thumbnail_url.clone(),
        })
    }
}
