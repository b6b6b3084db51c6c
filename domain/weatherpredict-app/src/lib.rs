use std::sync::Arc;

use crate::{
    domain::{event::EventRepository, forecast::WeatherPredictor, prediction::PredictionRepository},
    ports::authentication::AuthenticationPort,
    workflow::{
        dashboard::load::{LoadDashboardUseCase, LoadDashboardUseCaseImpl},
        events::create::{CreateEventUseCase, CreateEventUseCaseImpl},
        session::{
            resolve::{ResolveSessionUseCase, ResolveSessionUseCaseImpl},
            sign_in::{SignInUseCase, SignInUseCaseImpl},
            sign_out::{SignOutUseCase, SignOutUseCaseImpl},
        },
    },
};

pub mod domain;
pub mod ports;
pub mod workflow;

pub struct Application {
    pub dashboard_load_use_case: Box<dyn LoadDashboardUseCase + Send + Sync + 'static>,
    pub event_create_use_case: Box<dyn CreateEventUseCase + Send + Sync + 'static>,

    pub session_resolve_use_case: Box<dyn ResolveSessionUseCase + Send + Sync + 'static>,
    pub session_sign_in_use_case: Box<dyn SignInUseCase + Send + Sync + 'static>,
    pub session_sign_out_use_case: Box<dyn SignOutUseCase + Send + Sync + 'static>,
}

pub fn build_application<
    ER: EventRepository + Send + Sync + 'static,
    PR: PredictionRepository + Send + Sync + 'static,
    AS: AuthenticationPort + Send + Sync + 'static,
    WP: WeatherPredictor + Send + Sync + 'static,
>(
    event_repository: Arc<ER>,
    prediction_repository: Arc<PR>,
    authentication_service: Arc<AS>,
    weather_predictor: Arc<WP>,
) -> Application {
    Application {
        dashboard_load_use_case: Box::new(LoadDashboardUseCaseImpl::new(
            event_repository.clone(),
            prediction_repository.clone(),
        )),
        event_create_use_case: Box::new(CreateEventUseCaseImpl::new(
            event_repository.clone(),
            prediction_repository.clone(),
            weather_predictor.clone(),
        )),

        session_resolve_use_case: Box::new(ResolveSessionUseCaseImpl::new(
            authentication_service.clone(),
        )),
        session_sign_in_use_case: Box::new(SignInUseCaseImpl::new(
            authentication_service.clone(),
        )),
        session_sign_out_use_case: Box::new(SignOutUseCaseImpl::new(
            authentication_service.clone(),
        )),
    }
}
