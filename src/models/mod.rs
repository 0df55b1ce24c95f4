pub mod exercise;
pub mod outbox;
pub mod plan;
pub mod profile;
pub mod workout;

pub use exercise::{Exercise, ExercisePatch, NewExercise};
pub use outbox::{OutboxItem, OutboxOp};
pub use plan::{NewTemplate, NewWorkoutPlan, Template, TemplateItem, TemplatePatch, WorkoutPlan, WorkoutPlanPatch};
pub use profile::{Profile, ProfilePatch, Theme, PROFILE_ID};
pub use workout::{NewSetEntry, NewWorkout, SetEntry, SetEntryPatch, WeightUnit, Workout, WorkoutPatch};
