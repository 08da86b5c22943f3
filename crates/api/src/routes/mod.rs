pub mod claims;
pub mod documents;
pub mod health;
pub mod persons;
pub mod phases;
pub mod priority;
pub mod requests;
pub mod tasks;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /persons                                    list, create (GET, POST)
/// /persons/stats                              priority counts (GET)
/// /persons/{cpf}                              get, update, delete
/// /persons/{cpf}/priority-requests            priority requests (GET)
///
/// /phases                                     list, create (GET, POST)
/// /phases/{id}                                get, update, delete
/// /phases/{id}/toggle                         flip active flag (POST)
///
/// /fee-phases                                 list, create (GET, POST)
/// /fee-phases/{id}                            get, update, delete
/// /fee-phases/{id}/toggle                     flip active flag (POST)
///
/// /claim-types                                list, create (GET, POST)
/// /claim-types/{id}                           get, update, delete
/// /claim-types/{id}/toggle                    flip active flag (POST)
///
/// /claims                                     list, create (GET, POST)
/// /claims/{cnj}                               get, update, delete
/// /claims/{cnj}/persons                       list, link (GET, POST)
/// /claims/{cnj}/persons/{cpf}                 unlink (DELETE)
///
/// /documents                                  list, create (GET, POST)
/// /documents/{id}                             get, update, delete
/// /documents/{id}/phase                       change primary phase (PUT)
/// /documents/{id}/fee-phase                   change fee phase (PUT)
///
/// /requests                                   list, create (GET, POST)
/// /requests/{id}                              get, update, delete
/// /requests/{id}/phase                        change phase (PUT)
///
/// /task-types                                 list, create (GET, POST)
/// /task-types/{id}                            get, update, delete
///
/// /tasks                                      list, create (GET, POST)
/// /tasks/{id}                                 get, update, delete
/// /tasks/{id}/complete                        complete (POST)
/// /tasks/{id}/reopen                          reopen (POST)
///
/// /priority/reconcile                         run reconciliation (POST)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/persons", persons::router())
        // Phase catalogs.
        .nest("/phases", phases::router())
        .nest("/fee-phases", phases::fee_router())
        // Claims, their type catalog and their person links.
        .nest("/claim-types", claims::type_router())
        .nest("/claims", claims::router())
        // Workflow entities with audited phases.
        .nest("/documents", documents::router())
        .nest("/requests", requests::router())
        // Follow-up tasks and their type catalog.
        .nest("/task-types", tasks::type_router())
        .nest("/tasks", tasks::router())
        .nest("/priority", priority::router())
}
