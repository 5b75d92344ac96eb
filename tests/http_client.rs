use std::net::TcpListener;

use actix_web::{dev::ServerHandle, web, App, HttpServer};

use taskboard::client::{BoardAction, DropTarget, HttpTaskApi, LoadState, TaskApi, TaskBoard};
use taskboard::db;
use taskboard::filters::TaskFilter;
use taskboard::models::{NewTask, TaskPatch, TaskPriority, TaskStatus};

async fn spawn_server() -> (String, ServerHandle) {
    let pool = db::connect("sqlite::memory:", 1).await.unwrap();
    db::bootstrap(&pool).await.unwrap();

    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    let server = HttpServer::new(move || {
        App::new()
            .app_data(web::Data::new(pool.clone()))
            .configure(taskboard::configure)
    })
    .workers(1)
    .listen(listener)
    .unwrap()
    .run();

    let handle = server.handle();
    actix_web::rt::spawn(server);
    (format!("http://{addr}/"), handle)
}

fn new_task(title: &str, status: TaskStatus) -> NewTask {
    NewTask {
        title: title.into(),
        description: Some(format!("{title} notes")),
        status,
        priority: TaskPriority::High,
        user_id: 1,
        deadline: None,
    }
}

#[actix_web::test]
async fn client_round_trips_tasks_through_the_server() {
    let (base_url, handle) = spawn_server().await;
    let api = HttpTaskApi::new(base_url);

    let report = api.create(&new_task("Write report", TaskStatus::Todo)).await.unwrap();
    assert_eq!(report.task.title, "Write report");
    assert_eq!(report.task.status, TaskStatus::Todo);
    assert_eq!(report.task.description.as_deref(), Some("Write report notes"));
    let assignee = report.assignee.as_ref().unwrap();
    assert_eq!(assignee.id, 1);
    assert_eq!(assignee.name, "Default User");

    let shipped = api.create(&new_task("Ship it", TaskStatus::Done)).await.unwrap();

    let all = api.list(&TaskFilter::default()).await.unwrap();
    assert_eq!(all, vec![report.clone(), shipped.clone()]);

    let done = TaskFilter {
        status: Some(TaskStatus::Done),
        ..TaskFilter::default()
    };
    assert_eq!(api.list(&done).await.unwrap(), vec![shipped.clone()]);

    let renamed = api
        .update(
            report.task.id,
            &TaskPatch {
                title: Some("Write final report".into()),
                ..TaskPatch::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(renamed.task.title, "Write final report");
    assert_eq!(renamed.task.priority, TaskPriority::High);

    api.delete(shipped.task.id).await.unwrap();
    assert!(api.get(shipped.task.id).await.unwrap_err().is_not_found());

    handle.stop(true).await;
}

#[actix_web::test]
async fn client_surfaces_server_error_messages() {
    let (base_url, handle) = spawn_server().await;
    let api = HttpTaskApi::new(base_url);

    let missing = api.get(999).await.unwrap_err();
    assert!(missing.is_not_found());
    assert!(missing.to_string().contains("Task not found"), "{missing}");

    let task = api.create(&new_task("Keep title", TaskStatus::Todo)).await.unwrap();
    let rejected = api
        .update(
            task.task.id,
            &TaskPatch {
                title: Some(String::new()),
                ..TaskPatch::default()
            },
        )
        .await
        .unwrap_err();
    assert!(!rejected.is_not_found());
    assert_eq!(
        rejected.to_string(),
        "server responded with 400: Title must not be empty"
    );

    handle.stop(true).await;
}

#[actix_web::test]
async fn board_drop_persists_the_move() {
    let (base_url, handle) = spawn_server().await;
    let api = HttpTaskApi::new(base_url);
    let todo = api.create(&new_task("Drag me", TaskStatus::Todo)).await.unwrap();
    api.create(&new_task("Already done", TaskStatus::Done)).await.unwrap();

    let mut board = TaskBoard::new(api);
    board.refetch().await;
    assert_eq!(board.load_state(), &LoadState::Ready);
    assert_eq!(board.cache().len(), 2);

    assert!(board.drag_start(todo.task.id));
    let action = board
        .drop_on(Some(DropTarget::column(TaskStatus::Done)))
        .await
        .unwrap();
    assert_eq!(
        action,
        BoardAction::Move {
            task_id: todo.task.id,
            status: TaskStatus::Done
        }
    );
    assert_eq!(board.error(), None);

    let stored = board.api().get(todo.task.id).await.unwrap();
    assert_eq!(stored.task.status, TaskStatus::Done);

    handle.stop(true).await;
}
