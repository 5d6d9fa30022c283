//! Catalog reconciliation: settles which upload and build get installed.

use burrow_catalog::{
    CatalogClient, Platform, filtered_uploads, is_probably_external, log_upload,
};
use burrow_models::{Access, Build, Game, Upload};
use tracing::{error, info, warn};

use crate::error::QueueError;
use crate::prompt::{Confirmation, ExternalUploadConfirmer, UploadChoice, UploadChooser};

/// Catalog decisions for a job.
#[derive(Debug, Clone, PartialEq)]
pub struct Reconciled {
    pub game: Game,
    pub upload: Upload,
    pub build: Option<Build>,
}

/// Refreshes the game and resolves an upload and build against the catalog.
///
/// May suspend on the chooser or the confirmer. Holds no store access.
pub struct CatalogReconciler<'a> {
    catalog: &'a dyn CatalogClient,
    chooser: &'a dyn UploadChooser,
    confirmer: &'a dyn ExternalUploadConfirmer,
    platform: Platform,
}

impl<'a> CatalogReconciler<'a> {
    pub fn new(
        catalog: &'a dyn CatalogClient,
        chooser: &'a dyn UploadChooser,
        confirmer: &'a dyn ExternalUploadConfirmer,
        platform: Platform,
    ) -> Self {
        Self {
            catalog,
            chooser,
            confirmer,
            platform,
        }
    }

    /// Resolves the install target.
    ///
    /// `upload` and `build` are what the request (or its cave) already pins;
    /// anything missing is looked up. A pinned build is never replaced.
    pub async fn reconcile(
        &self,
        access: &Access,
        game: Game,
        upload: Option<Upload>,
        mut build: Option<Build>,
    ) -> Result<Reconciled, QueueError> {
        let game = self.refresh_game(access, game).await;

        let upload = match upload {
            Some(upload) => upload,
            None => {
                let chosen = self.pick_upload(access, &game).await?;
                // Fresh listing: its build is current.
                if let Some(latest) = &chosen.build {
                    info!(upload = chosen.id, build = latest.id, "using build from listing");
                    build = Some(latest.clone());
                }
                chosen
            }
        };

        if build.is_none() {
            build = self.latest_build(access, &game, &upload).await?;
        }

        if is_probably_external(&upload) {
            match self.confirmer.confirm_external_upload(&upload).await? {
                Confirmation::Accept => {
                    info!(upload = upload.id, host = %upload.host, "external upload accepted");
                }
                Confirmation::Decline => {
                    info!(upload = upload.id, "external upload declined");
                    return Err(QueueError::OperationAborted);
                }
            }
        }

        Ok(Reconciled {
            game,
            upload,
            build,
        })
    }

    /// Fetches fresh game metadata, keeping `stale` if the catalog fails.
    async fn refresh_game(&self, access: &Access, stale: Game) -> Game {
        match self.catalog.get_game(access, stale.id).await {
            Ok(fresh) => fresh,
            Err(e) => {
                warn!(
                    game = stale.id,
                    error = %e,
                    "could not refresh game info, using cached copy"
                );
                stale
            }
        }
    }

    async fn pick_upload(&self, access: &Access, game: &Game) -> Result<Upload, QueueError> {
        let result = filtered_uploads(self.catalog, game, access, self.platform).await?;
        let mut uploads = result.uploads;

        match uploads.len() {
            0 => {
                error!(
                    game = game.id,
                    platform = %self.platform,
                    total = result.initial_uploads.len(),
                    "no compatible uploads, full listing follows"
                );
                for upload in &result.initial_uploads {
                    log_upload(upload, upload.build.as_ref());
                }
                Err(QueueError::NoCompatibleUploads)
            }
            1 => {
                let upload = uploads.remove(0);
                info!(game = game.id, upload = upload.id, "single compatible upload, picking it");
                Ok(upload)
            }
            count => match self.chooser.pick_upload(&uploads).await? {
                UploadChoice::Aborted => {
                    info!(game = game.id, "upload choice aborted");
                    Err(QueueError::OperationAborted)
                }
                UploadChoice::Picked(index) if index < count => {
                    let upload = uploads.swap_remove(index);
                    info!(game = game.id, upload = upload.id, "upload picked");
                    Ok(upload)
                }
                UploadChoice::Picked(index) => Err(QueueError::Validation(format!(
                    "upload choice {index} out of range ({count} candidates)"
                ))),
            },
        }
    }

    async fn latest_build(
        &self,
        access: &Access,
        game: &Game,
        upload: &Upload,
    ) -> Result<Option<Build>, QueueError> {
        let uploads = self.catalog.list_game_uploads(access, game.id).await?;

        match uploads.into_iter().find(|u| u.id == upload.id) {
            Some(fresh) => {
                if let Some(latest) = &fresh.build {
                    info!(upload = upload.id, build = latest.id, "using latest build");
                }
                Ok(fresh.build)
            }
            None => {
                error!(game = game.id, upload = upload.id, "upload vanished from listing");
                log_upload(upload, None);
                Err(QueueError::NotFound("upload not found".into()))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{MockCatalog, MockChooser, MockConfirmer, build, external, game, upload};

    fn reconciler<'a>(
        catalog: &'a MockCatalog,
        chooser: &'a MockChooser,
        confirmer: &'a MockConfirmer,
    ) -> CatalogReconciler<'a> {
        CatalogReconciler::new(catalog, chooser, confirmer, Platform::Linux)
    }

    #[tokio::test]
    async fn chooser_picks_among_several() {
        let catalog = MockCatalog::new(game(42, "https://finji.example.io/overland"))
            .with_uploads(vec![upload(1, Some(build(11))), upload(2, None)]);
        let chooser = MockChooser::picking(0);
        let confirmer = MockConfirmer::accepting();

        let got = reconciler(&catalog, &chooser, &confirmer)
            .reconcile(&Access::default(), game(42, ""), None, None)
            .await
            .unwrap();

        assert_eq!(got.upload.id, 1);
        assert_eq!(got.build.unwrap().id, 11);
        assert_eq!(got.game.url, "https://finji.example.io/overland");
        assert_eq!(chooser.offered(), vec![vec![1, 2]]);
        // Build came with the listing, no follow-up call.
        assert_eq!(catalog.calls(), vec!["get_game:42", "list_uploads:42"]);
        assert!(confirmer.asked().is_empty());
    }

    #[tokio::test]
    async fn single_upload_skips_chooser() {
        let catalog = MockCatalog::new(game(42, "")).with_uploads(vec![upload(5, None)]);
        let chooser = MockChooser::picking(0);
        let confirmer = MockConfirmer::accepting();

        let got = reconciler(&catalog, &chooser, &confirmer)
            .reconcile(&Access::default(), game(42, ""), None, None)
            .await
            .unwrap();

        assert_eq!(got.upload.id, 5);
        assert!(got.build.is_none());
        assert!(chooser.offered().is_empty());
        // Build follow-up still happens.
        assert_eq!(
            catalog.calls(),
            vec!["get_game:42", "list_uploads:42", "list_uploads:42"]
        );
    }

    #[tokio::test]
    async fn no_compatible_uploads() {
        let mut windows_only = upload(1, None);
        windows_only.platforms.linux = false;
        windows_only.platforms.windows = true;
        let catalog = MockCatalog::new(game(42, "")).with_uploads(vec![windows_only]);
        let chooser = MockChooser::picking(0);
        let confirmer = MockConfirmer::accepting();

        let err = reconciler(&catalog, &chooser, &confirmer)
            .reconcile(&Access::default(), game(42, ""), None, None)
            .await
            .unwrap_err();

        assert!(matches!(err, QueueError::NoCompatibleUploads));
        assert_eq!(err.code(), Some(2001));
        assert!(chooser.offered().is_empty());
    }

    #[tokio::test]
    async fn aborted_choice_stops_catalog_calls() {
        let catalog = MockCatalog::new(game(42, ""))
            .with_uploads(vec![upload(1, None), upload(2, None)]);
        let chooser = MockChooser::aborting();
        let confirmer = MockConfirmer::accepting();

        let err = reconciler(&catalog, &chooser, &confirmer)
            .reconcile(&Access::default(), game(42, ""), None, None)
            .await
            .unwrap_err();

        assert!(err.is_aborted());
        assert_eq!(catalog.calls(), vec!["get_game:42", "list_uploads:42"]);
    }

    #[tokio::test]
    async fn out_of_range_choice_is_invalid() {
        let catalog = MockCatalog::new(game(42, ""))
            .with_uploads(vec![upload(1, None), upload(2, None)]);
        let chooser = MockChooser::picking(2);
        let confirmer = MockConfirmer::accepting();

        let err = reconciler(&catalog, &chooser, &confirmer)
            .reconcile(&Access::default(), game(42, ""), None, None)
            .await
            .unwrap_err();

        assert!(matches!(err, QueueError::Validation(_)));
    }

    #[tokio::test]
    async fn stale_game_used_when_refresh_fails() {
        let catalog = MockCatalog::failing_game().with_uploads(vec![upload(1, None)]);
        let chooser = MockChooser::picking(0);
        let confirmer = MockConfirmer::accepting();

        let got = reconciler(&catalog, &chooser, &confirmer)
            .reconcile(&Access::default(), game(42, "https://old.example.io/name"), None, None)
            .await
            .unwrap();

        assert_eq!(got.game.url, "https://old.example.io/name");
        assert_eq!(got.upload.id, 1);
    }

    #[tokio::test]
    async fn pinned_upload_gets_latest_build() {
        let catalog = MockCatalog::new(game(42, ""))
            .with_uploads(vec![upload(1, Some(build(12))), upload(2, None)]);
        let chooser = MockChooser::picking(0);
        let confirmer = MockConfirmer::accepting();

        let got = reconciler(&catalog, &chooser, &confirmer)
            .reconcile(&Access::default(), game(42, ""), Some(upload(1, None)), None)
            .await
            .unwrap();

        assert_eq!(got.build.unwrap().id, 12);
        assert!(chooser.offered().is_empty());
    }

    #[tokio::test]
    async fn pinned_build_is_kept() {
        let catalog = MockCatalog::new(game(42, "")).with_uploads(vec![upload(1, Some(build(12)))]);
        let chooser = MockChooser::picking(0);
        let confirmer = MockConfirmer::accepting();

        let got = reconciler(&catalog, &chooser, &confirmer)
            .reconcile(
                &Access::default(),
                game(42, ""),
                Some(upload(1, None)),
                Some(build(10)),
            )
            .await
            .unwrap();

        assert_eq!(got.build.unwrap().id, 10);
        assert_eq!(catalog.calls(), vec!["get_game:42"]);
    }

    #[tokio::test]
    async fn vanished_upload_not_found() {
        let catalog = MockCatalog::new(game(42, "")).with_uploads(vec![upload(2, None)]);
        let chooser = MockChooser::picking(0);
        let confirmer = MockConfirmer::accepting();

        let err = reconciler(&catalog, &chooser, &confirmer)
            .reconcile(&Access::default(), game(42, ""), Some(upload(9, None)), None)
            .await
            .unwrap_err();

        assert!(matches!(err, QueueError::NotFound(msg) if msg == "upload not found"));
    }

    #[tokio::test]
    async fn listing_failure_aborts() {
        let catalog = MockCatalog::new(game(42, "")).failing_uploads();
        let chooser = MockChooser::picking(0);
        let confirmer = MockConfirmer::accepting();

        let err = reconciler(&catalog, &chooser, &confirmer)
            .reconcile(&Access::default(), game(42, ""), None, None)
            .await
            .unwrap_err();

        assert!(matches!(err, QueueError::Catalog(_)));
    }

    #[tokio::test]
    async fn external_upload_declined() {
        let catalog = MockCatalog::new(game(42, "")).with_uploads(vec![external(3)]);
        let chooser = MockChooser::picking(0);
        let confirmer = MockConfirmer::declining();

        let err = reconciler(&catalog, &chooser, &confirmer)
            .reconcile(&Access::default(), game(42, ""), Some(external(3)), None)
            .await
            .unwrap_err();

        assert!(err.is_aborted());
        assert_eq!(confirmer.asked(), vec![3]);
    }

    #[tokio::test]
    async fn external_upload_accepted() {
        let catalog = MockCatalog::new(game(42, "")).with_uploads(vec![external(3)]);
        let chooser = MockChooser::picking(0);
        let confirmer = MockConfirmer::accepting();

        let got = reconciler(&catalog, &chooser, &confirmer)
            .reconcile(&Access::default(), game(42, ""), Some(external(3)), None)
            .await
            .unwrap();

        assert_eq!(got.upload.id, 3);
        assert_eq!(confirmer.asked(), vec![3]);
    }
}
